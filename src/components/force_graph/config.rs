//! Tuning constants for the simulation and the view.
//!
//! Every value can be overridden from the sitemap document; fields left out
//! keep their defaults.

use serde::Deserialize;

use super::error::ConfigurationError;

/// Physics and cooling schedule parameters.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimulationConfig {
	/// Simulation settles once alpha drops below this.
	pub alpha_min: f64,
	/// Fraction of the remaining distance to `alpha_target` covered each tick.
	pub alpha_decay: f64,
	/// Friction: fraction of velocity removed each tick.
	pub velocity_decay: f64,
	/// Alpha (and alpha target) applied while a node is dragged.
	pub reheat_alpha: f64,
	/// Many-body repulsion strength, multiplied by the pushing node's radius.
	pub charge_strength: f64,
	/// Distances below this are clamped when computing repulsion.
	pub charge_distance_min: f64,
	/// Gain pulling every node toward the canvas center.
	pub center_strength: f64,
	/// Extra clearance added to the sum of radii before collision kicks in.
	pub collision_padding: f64,
	/// Gain of the soft collision push applied with the other forces.
	pub collision_strength: f64,
	/// Separation passes run on positions after each tick's integration.
	pub collision_iterations: u32,
	/// Added to both radii to derive a link's default rest length.
	pub link_spacing: f64,
	/// Default strength of parent/child links.
	pub hierarchy_strength: f64,
	/// Default strength of cross links.
	pub cross_link_strength: f64,
	/// Radius of the circle nodes are placed on before the first tick.
	pub initial_radius: f64,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		Self {
			alpha_min: 0.001,
			alpha_decay: 1.0 - 0.001_f64.powf(1.0 / 300.0),
			velocity_decay: 0.4,
			reheat_alpha: 0.3,
			charge_strength: 30.0,
			charge_distance_min: 10.0,
			center_strength: 0.02,
			collision_padding: 2.0,
			collision_strength: 0.7,
			collision_iterations: 4,
			link_spacing: 40.0,
			hierarchy_strength: 0.8,
			cross_link_strength: 0.3,
			initial_radius: 100.0,
		}
	}
}

/// Zoom limits and pointer handling parameters.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewConfig {
	pub scale_min: f64,
	pub scale_max: f64,
	/// Wheel delta multiplier; one wheel notch (100) zooms by 2^(-0.2).
	pub zoom_sensitivity: f64,
	/// Screen-space pointer travel below which a drag counts as a click.
	pub click_threshold: f64,
	/// World-space margin added to node radii for hit testing.
	pub hover_slop: f64,
	/// Radius multiplier for the hovered node.
	pub hover_scale: f64,
}

impl Default for ViewConfig {
	fn default() -> Self {
		Self {
			scale_min: 0.3,
			scale_max: 3.0,
			zoom_sensitivity: 0.002,
			click_threshold: 4.0,
			hover_slop: 3.0,
			hover_scale: 1.25,
		}
	}
}

/// Complete widget tuning as embedded in the sitemap document.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SitemapConfig {
	pub simulation: SimulationConfig,
	pub view: ViewConfig,
}

fn check(field: &'static str, value: f64, ok: bool) -> Result<(), ConfigurationError> {
	if ok && value.is_finite() {
		Ok(())
	} else {
		Err(ConfigurationError::InvalidTuning { field, value })
	}
}

impl SimulationConfig {
	pub fn validate(&self) -> Result<(), ConfigurationError> {
		check("alphaMin", self.alpha_min, self.alpha_min > 0.0 && self.alpha_min < 1.0)?;
		check("alphaDecay", self.alpha_decay, self.alpha_decay > 0.0 && self.alpha_decay < 1.0)?;
		check(
			"velocityDecay",
			self.velocity_decay,
			self.velocity_decay > 0.0 && self.velocity_decay < 1.0,
		)?;
		check(
			"reheatAlpha",
			self.reheat_alpha,
			self.reheat_alpha > self.alpha_min && self.reheat_alpha <= 1.0,
		)?;
		check("chargeStrength", self.charge_strength, self.charge_strength >= 0.0)?;
		check("chargeDistanceMin", self.charge_distance_min, self.charge_distance_min > 0.0)?;
		check("centerStrength", self.center_strength, self.center_strength >= 0.0)?;
		check("collisionPadding", self.collision_padding, self.collision_padding >= 0.0)?;
		check("collisionStrength", self.collision_strength, self.collision_strength >= 0.0)?;
		check(
			"collisionIterations",
			f64::from(self.collision_iterations),
			self.collision_iterations >= 1,
		)?;
		check("linkSpacing", self.link_spacing, self.link_spacing >= 0.0)?;
		check(
			"hierarchyStrength",
			self.hierarchy_strength,
			self.hierarchy_strength > 0.0 && self.hierarchy_strength <= 1.0,
		)?;
		check(
			"crossLinkStrength",
			self.cross_link_strength,
			self.cross_link_strength > 0.0 && self.cross_link_strength <= 1.0,
		)?;
		check("initialRadius", self.initial_radius, self.initial_radius >= 0.0)
	}
}

impl ViewConfig {
	pub fn validate(&self) -> Result<(), ConfigurationError> {
		check("scaleMin", self.scale_min, self.scale_min > 0.0)?;
		check("scaleMax", self.scale_max, self.scale_max >= self.scale_min)?;
		check("zoomSensitivity", self.zoom_sensitivity, self.zoom_sensitivity > 0.0)?;
		check("clickThreshold", self.click_threshold, self.click_threshold >= 0.0)?;
		check("hoverSlop", self.hover_slop, self.hover_slop >= 0.0)?;
		check("hoverScale", self.hover_scale, self.hover_scale >= 1.0)
	}
}

impl SitemapConfig {
	pub fn validate(&self) -> Result<(), ConfigurationError> {
		self.simulation.validate()?;
		self.view.validate()
	}
}
