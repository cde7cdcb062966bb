//! Human-readable names for ComfyUI node classes.

/// The kind of work a ComfyUI node performs, keyed by its `class_type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    LoadModel,
    EncodePrompt,
    Sample,
    DecodeLatent,
    SaveImage,
    /// Any node class without a dedicated label.
    Other(String),
}

impl Operation {
    /// Map a workflow node's `class_type` to an operation.
    pub fn from_class_type(class_type: &str) -> Self {
        match class_type {
            "CheckpointLoaderSimple" => Self::LoadModel,
            "CLIPTextEncode" => Self::EncodePrompt,
            "KSampler" => Self::Sample,
            "VAEDecode" => Self::DecodeLatent,
            "SaveImage" => Self::SaveImage,
            other => Self::Other(other.to_string()),
        }
    }

    /// Label shown next to a progress bar.
    pub fn label(&self) -> String {
        match self {
            Self::LoadModel => "📦 Loading Model".into(),
            Self::EncodePrompt => "📝 Processing Prompt".into(),
            Self::Sample => "🎨 Sampling (KSampler)".into(),
            Self::DecodeLatent => "🎭 VAE Decoding".into(),
            Self::SaveImage => "💾 Saving Image".into(),
            Self::Other(class_type) => format!("⚙️ Running {class_type}"),
        }
    }
}
