use leptos::prelude::*;

use crate::components::force_graph::SitemapGraph;
use crate::load_sitemap_data;

/// Sitemap page: the full-window graph, or the reason it cannot be shown.
#[component]
pub fn Home() -> impl IntoView {
	let sitemap = move || {
		load_sitemap_data().map(|sitemap| {
			let sitemap = Signal::derive(move || sitemap.clone());
			view! {
				<div class="fullscreen-graph">
					<SitemapGraph sitemap=sitemap fullscreen=true />
					<div class="graph-overlay">
						<h1>"Documentation Sitemap"</h1>
						<p class="subtitle">
							"Click a page to open it. Drag nodes to rearrange. Scroll to zoom. Drag background to pan."
						</p>
					</div>
				</div>
			}
		})
	};

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"The sitemap could not be displayed"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>
			{sitemap}
		</ErrorBoundary>
	}
}
