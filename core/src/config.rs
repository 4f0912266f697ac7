/// In-image layout the generated Dockerfile targets.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildLayout {
    /// Name of the configuration build stage, referenced by `COPY --from`
    pub stage_name: String,

    /// Interpreter binary invoked by every RUN and the final CMD
    pub interpreter: String,

    /// Directory holding the image, with trailing slash
    pub image_dir: String,

    /// Image base name (without `.image`/`.changes` extension)
    pub image_name: String,
}

impl Default for BuildLayout {
    fn default() -> Self {
        Self {
            stage_name: "configuration".to_string(),
            interpreter: "/usr/local/bin/pharo".to_string(),
            image_dir: "/var/pharo/images/default/".to_string(),
            image_name: "Pharo".to_string(),
        }
    }
}

impl BuildLayout {
    /// Path of the image file passed to the interpreter.
    pub fn script_path(&self) -> String {
        format!("{}{}.image", self.image_dir, self.image_name)
    }

    /// Image-state artifacts carried from the configuration stage, as a
    /// brace pattern covering both the image and its changes file.
    pub fn image_artifacts(&self) -> String {
        format!("{}{}.{{image,changes}}", self.image_dir, self.image_name)
    }
}
