//! Phong material coefficients

use glam::Vec4;

use crate::renderer::device::{ProgramHandle, RenderDevice};

/// Lighting coefficients carried by renderable nodes
///
/// The scene treats this as an opaque bundle; it only gets published to the
/// shader program right before the owning node draws.
#[derive(Debug, Clone)]
pub struct Material {
    /// Ambient color
    pub ambient: Vec4,
    /// Diffuse color
    pub diffuse: Vec4,
    /// Specular color
    pub specular: Vec4,
    /// Emissive color
    pub emissive: Vec4,
    /// Specular exponent
    pub specular_power: f32,
}

impl Material {
    /// Create a material with the given diffuse color and neutral defaults
    pub fn new(diffuse: Vec4) -> Self {
        Self {
            ambient: Vec4::new(0.1, 0.1, 0.1, 1.0),
            diffuse,
            specular: Vec4::ONE,
            emissive: Vec4::new(0.0, 0.0, 0.0, 1.0),
            specular_power: 32.0,
        }
    }

    /// Create a matte material (no specular highlight)
    pub fn matte(diffuse: Vec4) -> Self {
        Self {
            specular: Vec4::new(0.0, 0.0, 0.0, 1.0),
            specular_power: 1.0,
            ..Self::new(diffuse)
        }
    }

    /// Create a shiny material with a tight highlight
    pub fn shiny(diffuse: Vec4) -> Self {
        Self {
            specular_power: 64.0,
            ..Self::new(diffuse)
        }
    }

    /// Publish the coefficients to a program as uniforms
    ///
    /// Best-effort like all uniform traffic; a program without material
    /// uniforms is left alone.
    pub fn apply(&self, device: &mut dyn RenderDevice, program: ProgramHandle) {
        device.set_uniform_vec4(program, "materialAmbient", self.ambient);
        device.set_uniform_vec4(program, "materialDiffuse", self.diffuse);
        device.set_uniform_vec4(program, "materialSpecular", self.specular);
        device.set_uniform_vec4(program, "materialEmissive", self.emissive);
        device.set_uniform_float(program, "materialSpecularPower", self.specular_power);
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new(Vec4::new(0.8, 0.8, 0.8, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::headless::HeadlessDevice;

    #[test]
    fn test_apply_publishes_all_coefficients() {
        let mut device = HeadlessDevice::new();
        let material = Material::shiny(Vec4::new(0.2, 0.9, 0.2, 1.0));
        material.apply(&mut device, ProgramHandle(1));

        assert_eq!(
            device.vec4_uniform("materialDiffuse"),
            Some(Vec4::new(0.2, 0.9, 0.2, 1.0))
        );
        assert_eq!(device.vec4_uniform("materialAmbient"), Some(material.ambient));
        assert_eq!(device.vec4_uniform("materialSpecular"), Some(Vec4::ONE));
        assert_eq!(
            device.vec4_uniform("materialEmissive"),
            Some(Vec4::new(0.0, 0.0, 0.0, 1.0))
        );
        assert_eq!(device.float_uniform("materialSpecularPower"), Some(64.0));
    }

    #[test]
    fn test_apply_to_null_program_records_nothing() {
        let mut device = HeadlessDevice::new();
        Material::default().apply(&mut device, ProgramHandle::NULL);
        assert_eq!(device.vec4_uniform("materialDiffuse"), None);
        assert_eq!(device.float_uniform("materialSpecularPower"), None);
    }

    #[test]
    fn test_matte_disables_highlight() {
        let material = Material::matte(Vec4::ONE);
        assert_eq!(material.specular, Vec4::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(material.specular_power, 1.0);
    }
}
