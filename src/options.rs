//! Immutable view options and the rebuild-reporting diff
//!
//! The render system holds one [`ViewOptions`] value at a time. Updates come
//! in as an [`OptionsPatch`]; [`ViewOptions::apply`] is a pure function that
//! produces the next value together with a [`Rebuild`] report naming the
//! artifacts the change invalidates. Nothing is mutated in place.

use spinviz_render::GlyphParams;

/// The complete recognized option set of the viewer
#[derive(Clone, Debug, PartialEq)]
pub struct ViewOptions {
    pub glyph: GlyphParams,
    pub colormap: String,
    pub vertical_fov: f32,
    pub allow_camera_movement: bool,
    pub camera_location: [f32; 3],
    pub center_location: [f32; 3],
    pub up_vector: [f32; 3],
    pub background_color: [f32; 3],
}

/// A partial option update; `None` fields are left untouched
#[derive(Clone, Debug, Default)]
pub struct OptionsPatch {
    pub level_of_detail: Option<u32>,
    pub cone_height: Option<f32>,
    pub cone_radius: Option<f32>,
    pub cylinder_height: Option<f32>,
    pub cylinder_radius: Option<f32>,
    pub colormap: Option<String>,
    pub vertical_fov: Option<f32>,
    pub allow_camera_movement: Option<bool>,
    pub camera_location: Option<[f32; 3]>,
    pub center_location: Option<[f32; 3]>,
    pub up_vector: Option<[f32; 3]>,
    pub background_color: Option<[f32; 3]>,
}

/// Which artifacts an option change invalidates
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rebuild {
    /// The glyph mesh must be rebuilt (a shape parameter changed)
    pub mesh: bool,
    /// The shader program must be rebuilt (the colormap changed)
    pub shader: bool,
    /// Camera state must be reapplied
    pub camera: bool,
}

impl Rebuild {
    pub fn any(self) -> bool {
        self.mesh || self.shader || self.camera
    }
}

impl ViewOptions {
    /// Apply a patch, returning the next option value and the rebuild report.
    ///
    /// Setting a field to its current value is not a change and triggers no
    /// rebuild.
    pub fn apply(&self, patch: &OptionsPatch) -> (ViewOptions, Rebuild) {
        let mut next = self.clone();
        let mut rebuild = Rebuild::default();

        fn set<T: PartialEq + Copy>(target: &mut T, value: Option<T>, changed: &mut bool) {
            if let Some(value) = value {
                if *target != value {
                    *target = value;
                    *changed = true;
                }
            }
        }

        set(&mut next.glyph.level_of_detail, patch.level_of_detail, &mut rebuild.mesh);
        set(&mut next.glyph.cone_height, patch.cone_height, &mut rebuild.mesh);
        set(&mut next.glyph.cone_radius, patch.cone_radius, &mut rebuild.mesh);
        set(&mut next.glyph.cylinder_height, patch.cylinder_height, &mut rebuild.mesh);
        set(&mut next.glyph.cylinder_radius, patch.cylinder_radius, &mut rebuild.mesh);

        if let Some(colormap) = &patch.colormap {
            if *colormap != next.colormap {
                next.colormap = colormap.clone();
                rebuild.shader = true;
            }
        }

        set(&mut next.vertical_fov, patch.vertical_fov, &mut rebuild.camera);
        set(&mut next.camera_location, patch.camera_location, &mut rebuild.camera);
        set(&mut next.center_location, patch.center_location, &mut rebuild.camera);
        set(&mut next.up_vector, patch.up_vector, &mut rebuild.camera);
        set(&mut next.background_color, patch.background_color, &mut rebuild.camera);

        // Not a rebuild: the input layer reads this directly.
        if let Some(allow) = patch.allow_camera_movement {
            next.allow_camera_movement = allow;
        }

        (next, rebuild)
    }
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            glyph: GlyphParams::default(),
            colormap: "red".to_string(),
            vertical_fov: 45.0,
            allow_camera_movement: true,
            camera_location: [0.0, 0.0, 1.0],
            center_location: [0.0, 0.0, 0.0],
            up_vector: [0.0, 1.0, 0.0],
            background_color: [0.0, 0.0, 0.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_patch_changes_nothing() {
        let options = ViewOptions::default();
        let (next, rebuild) = options.apply(&OptionsPatch::default());
        assert_eq!(next, options);
        assert!(!rebuild.any());
    }

    #[test]
    fn test_shape_change_rebuilds_mesh_only() {
        let options = ViewOptions::default();
        let patch = OptionsPatch {
            cone_height: Some(1.5),
            ..OptionsPatch::default()
        };
        let (next, rebuild) = options.apply(&patch);
        assert_eq!(next.glyph.cone_height, 1.5);
        assert!(rebuild.mesh);
        assert!(!rebuild.shader);
        assert!(!rebuild.camera);
    }

    #[test]
    fn test_colormap_change_rebuilds_shader_only() {
        let options = ViewOptions::default();
        let patch = OptionsPatch {
            colormap: Some("hue".to_string()),
            ..OptionsPatch::default()
        };
        let (next, rebuild) = options.apply(&patch);
        assert_eq!(next.colormap, "hue");
        assert!(rebuild.shader);
        assert!(!rebuild.mesh);
    }

    #[test]
    fn test_same_value_is_not_a_change() {
        let options = ViewOptions::default();
        let patch = OptionsPatch {
            cone_height: Some(options.glyph.cone_height),
            colormap: Some(options.colormap.clone()),
            ..OptionsPatch::default()
        };
        let (next, rebuild) = options.apply(&patch);
        assert_eq!(next, options);
        assert!(!rebuild.any());
    }

    #[test]
    fn test_camera_fields_flag_camera() {
        let options = ViewOptions::default();
        let patch = OptionsPatch {
            camera_location: Some([0.0, 0.0, 50.0]),
            background_color: Some([1.0, 1.0, 1.0]),
            ..OptionsPatch::default()
        };
        let (next, rebuild) = options.apply(&patch);
        assert!(rebuild.camera);
        assert!(!rebuild.mesh);
        assert_eq!(next.camera_location, [0.0, 0.0, 50.0]);
    }

    #[test]
    fn test_apply_leaves_input_untouched() {
        let options = ViewOptions::default();
        let patch = OptionsPatch {
            cone_radius: Some(9.0),
            ..OptionsPatch::default()
        };
        let (_, _) = options.apply(&patch);
        assert_eq!(options.glyph.cone_radius, GlyphParams::default().cone_radius);
    }
}
