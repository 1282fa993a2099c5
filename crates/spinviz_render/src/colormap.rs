//! Direction-to-color mappings
//!
//! Each colormap is a WGSL fragment defining
//! `fn colormap(direction: vec3<f32>) -> vec3<f32>`, spliced into the glyph
//! shader by [`crate::shader::compose_source`]. The built-in set is a closed
//! enum; [`ColormapRegistry`] adds explicit registration of custom sources on
//! top of it.
//!
//! Every variant also carries a CPU mirror of its WGSL ([`Colormap::sample`])
//! so color properties are testable without a GPU device.

const RED_SOURCE: &str = "
fn colormap(direction: vec3<f32>) -> vec3<f32> {
    return vec3<f32>(1.0, 0.0, 0.0);
}
";

const RED_BLUE_SOURCE: &str = "
fn colormap(direction: vec3<f32>) -> vec3<f32> {
    let color_down = vec3<f32>(0.0, 0.0, 1.0);
    let color_up = vec3<f32>(1.0, 0.0, 0.0);
    return mix(color_down, color_up, direction.z * 0.5 + 0.5);
}
";

const HUE_SOURCE: &str = "
fn hsv2rgb(c: vec3<f32>) -> vec3<f32> {
    let k = vec4<f32>(1.0, 2.0 / 3.0, 1.0 / 3.0, 3.0);
    let p = abs(fract(c.xxx + k.xyz) * 6.0 - k.www);
    return c.z * mix(vec3<f32>(k.x), clamp(p - vec3<f32>(k.x), vec3<f32>(0.0), vec3<f32>(1.0)), c.y);
}

fn colormap(direction: vec3<f32>) -> vec3<f32> {
    let planar = direction.yz;
    let planar_length = length(planar);
    if (planar_length < 1e-6) {
        return vec3<f32>(0.5, 0.5, 0.5);
    }
    let unit = planar / planar_length;
    let hue = atan2(unit.x, unit.y) / 6.2831853;
    return hsv2rgb(vec3<f32>(hue, 1.0, 1.0));
}
";

/// Built-in direction-to-color mappings
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Colormap {
    /// Constant red
    Red,
    /// Blend from blue (-z) to red (+z) on the axial component
    RedBlue,
    /// Hue wheel over the angle of the direction's yz-projection
    Hue,
}

impl Colormap {
    pub const ALL: [Colormap; 3] = [Colormap::Red, Colormap::RedBlue, Colormap::Hue];

    pub fn name(self) -> &'static str {
        match self {
            Colormap::Red => "red",
            Colormap::RedBlue => "redblue",
            Colormap::Hue => "hue",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    /// WGSL source implementing `colormap` for this variant
    pub fn source(self) -> &'static str {
        match self {
            Colormap::Red => RED_SOURCE,
            Colormap::RedBlue => RED_BLUE_SOURCE,
            Colormap::Hue => HUE_SOURCE,
        }
    }

    /// CPU mirror of the WGSL mapping.
    ///
    /// Used by tests and anywhere a host needs the color of a direction
    /// without a device (legends, pickers). Matches the shader math exactly,
    /// including the degenerate-input fallback.
    pub fn sample(self, direction: [f32; 3]) -> [f32; 3] {
        match self {
            Colormap::Red => [1.0, 0.0, 0.0],
            Colormap::RedBlue => {
                let t = direction[2] * 0.5 + 0.5;
                [t, 0.0, 1.0 - t]
            }
            Colormap::Hue => {
                let (py, pz) = (direction[1], direction[2]);
                let planar_length = (py * py + pz * pz).sqrt();
                if planar_length < 1e-6 {
                    return [0.5, 0.5, 0.5];
                }
                let hue = py.atan2(pz) / (2.0 * std::f32::consts::PI);
                hsv_to_rgb(hue, 1.0, 1.0)
            }
        }
    }
}

fn hsv_to_rgb(h: f32, s: f32, v: f32) -> [f32; 3] {
    let component = |offset: f32| {
        let p = ((h + offset).rem_euclid(1.0) * 6.0 - 3.0).abs();
        v * (1.0 + s * ((p - 1.0).clamp(0.0, 1.0) - 1.0))
    };
    [component(1.0), component(2.0 / 3.0), component(1.0 / 3.0)]
}

/// Resolves colormap names to WGSL sources.
///
/// Built-in variants are always present; custom sources can be added through
/// [`register`](Self::register), which validates the entry point and refuses
/// to shadow existing names.
#[derive(Default)]
pub struct ColormapRegistry {
    custom: Vec<(String, String)>,
}

impl ColormapRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the WGSL source for a colormap name.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        if let Some(builtin) = Colormap::from_name(name) {
            return Some(builtin.source());
        }
        self.custom
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, source)| source.as_str())
    }

    /// Register a custom colormap source under a new name.
    pub fn register(&mut self, name: &str, source: &str) -> Result<(), ColormapError> {
        if self.resolve(name).is_some() {
            return Err(ColormapError::DuplicateName(name.to_string()));
        }
        if !source.contains("fn colormap(") {
            return Err(ColormapError::MissingEntryPoint(name.to_string()));
        }
        self.custom.push((name.to_string(), source.to_string()));
        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ColormapError {
    /// The name is already taken by a built-in or custom colormap
    DuplicateName(String),
    /// The source does not define `fn colormap(...)`
    MissingEntryPoint(String),
}

impl std::fmt::Display for ColormapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColormapError::DuplicateName(name) => {
                write!(f, "colormap '{}' is already registered", name)
            }
            ColormapError::MissingEntryPoint(name) => {
                write!(f, "colormap '{}' does not define fn colormap(...)", name)
            }
        }
    }
}

impl std::error::Error for ColormapError {}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.0001;

    fn color_approx_eq(a: [f32; 3], b: [f32; 3]) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < EPSILON)
    }

    #[test]
    fn test_names_round_trip() {
        for c in Colormap::ALL {
            assert_eq!(Colormap::from_name(c.name()), Some(c));
        }
        assert_eq!(Colormap::from_name("plasma"), None);
    }

    #[test]
    fn test_sources_define_entry_point() {
        for c in Colormap::ALL {
            assert!(c.source().contains("fn colormap(direction: vec3<f32>) -> vec3<f32>"));
        }
    }

    #[test]
    fn test_red_is_constant() {
        for dir in [[0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 0.0, 0.0]] {
            assert_eq!(Colormap::Red.sample(dir), [1.0, 0.0, 0.0]);
        }
    }

    #[test]
    fn test_redblue_axial_endpoints() {
        assert!(color_approx_eq(
            Colormap::RedBlue.sample([0.0, 0.0, 1.0]),
            [1.0, 0.0, 0.0]
        ));
        assert!(color_approx_eq(
            Colormap::RedBlue.sample([0.0, 0.0, -1.0]),
            [0.0, 0.0, 1.0]
        ));
        // Equatorial directions blend to the midpoint.
        assert!(color_approx_eq(
            Colormap::RedBlue.sample([1.0, 0.0, 0.0]),
            [0.5, 0.0, 0.5]
        ));
    }

    #[test]
    fn test_hue_cardinal_directions() {
        // hue 0 (planar projection (0, 1)) is red
        assert!(color_approx_eq(
            Colormap::Hue.sample([0.0, 0.0, 1.0]),
            [1.0, 0.0, 0.0]
        ));
        // quarter turn (planar projection (1, 0)) lands at hue 0.25
        assert!(color_approx_eq(
            Colormap::Hue.sample([0.0, 1.0, 0.0]),
            [0.5, 1.0, 0.0]
        ));
    }

    #[test]
    fn test_hue_degenerate_direction_has_defined_fallback() {
        for dir in [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [-2.0, 0.0, 0.0]] {
            let color = Colormap::Hue.sample(dir);
            assert_eq!(color, [0.5, 0.5, 0.5]);
            assert!(color.iter().all(|c| c.is_finite()));
        }
    }

    #[test]
    fn test_registry_resolves_builtins() {
        let registry = ColormapRegistry::new();
        assert!(registry.resolve("red").is_some());
        assert!(registry.resolve("redblue").is_some());
        assert!(registry.resolve("hue").is_some());
        assert!(registry.resolve("unknown").is_none());
    }

    #[test]
    fn test_registry_custom_registration() {
        let mut registry = ColormapRegistry::new();
        let source = "fn colormap(direction: vec3<f32>) -> vec3<f32> { return direction; }";
        registry.register("passthrough", source).unwrap();
        assert_eq!(registry.resolve("passthrough"), Some(source));
    }

    #[test]
    fn test_registry_rejects_builtin_shadowing() {
        let mut registry = ColormapRegistry::new();
        let err = registry
            .register("red", "fn colormap(d: vec3<f32>) -> vec3<f32> { return d; }")
            .unwrap_err();
        assert_eq!(err, ColormapError::DuplicateName("red".to_string()));
    }

    #[test]
    fn test_registry_rejects_missing_entry_point() {
        let mut registry = ColormapRegistry::new();
        let err = registry
            .register("broken", "fn other() -> f32 { return 1.0; }")
            .unwrap_err();
        assert_eq!(err, ColormapError::MissingEntryPoint("broken".to_string()));
    }
}
