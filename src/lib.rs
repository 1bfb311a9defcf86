//! Interactive documentation sitemap: a force-directed graph of categories and
//! pages rendered on a canvas, with drag, zoom, pan, hover and click-through.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

// Modules
pub mod components;
mod pages;

pub use components::force_graph::{LoadError, Sitemap, SitemapData, SitemapGraph};

// Top-Level pages
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

/// Id of the `<script type="application/json">` element holding the sitemap.
pub const SITEMAP_ELEMENT_ID: &str = "sitemap-data";

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// Parses and validates a sitemap document.
pub fn parse_sitemap(json: &str) -> Result<Sitemap, LoadError> {
	let data: SitemapData = serde_json::from_str(json)?;
	Ok(Sitemap::from_data(&data)?)
}

/// Loads the sitemap embedded in the page by the documentation build.
pub fn load_sitemap_data() -> Result<Sitemap, LoadError> {
	let missing = LoadError::MissingElement(SITEMAP_ELEMENT_ID);
	let window: Window = web_sys::window().ok_or(LoadError::MissingElement("window"))?;
	let script: HtmlScriptElement = window
		.document()
		.and_then(|document| document.get_element_by_id(SITEMAP_ELEMENT_ID))
		.and_then(|element| element.dyn_into().ok())
		.ok_or(missing)?;
	let json_text = script.text().unwrap_or_default();

	match parse_sitemap(&json_text) {
		Ok(sitemap) => {
			info!(
				"sitemap: loaded {} nodes, {} links",
				sitemap.graph.len(),
				sitemap.graph.links().len()
			);
			Ok(sitemap)
		}
		Err(e) => {
			warn!("sitemap: unusable data: {}", e);
			Err(e)
		}
	}
}

/// An app router which renders the sitemap and handles 404's
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />

		// sets the document title
		<Title text="Documentation Sitemap" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
			</Routes>
		</Router>
	}
}
