use clap::Parser;

/// The default directory for retained original files.
const DEFAULT_UPLOAD_PATH: &str = "upload";
/// The default address to listen on.
const DEFAULT_ADDRESS: &str = "0.0.0.0:8000";
/// The default OpenAI compatible API endpoint.
const DEFAULT_LLM_URL: &str = "https://api.openai.com/v1";
/// The default chat model.
const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";
/// The default transcription model.
const DEFAULT_TRANSCRIPTION_MODEL: &str = "whisper-1";

#[derive(Debug, Parser)]
#[command(name = "kennisbank", version = "0.1", about = "Orthomolecular knowledge base", long_about = None)]
pub struct StartArgs {
    /// RUST_LOG string to use as the env filter.
    #[arg(short, long)]
    log: Option<String>,

    /// Directory in which original files (PDFs, images) are retained.
    #[arg(short, long)]
    upload_path: Option<String>,

    /// Address to listen on.
    #[arg(short, long)]
    address: Option<String>,

    /// Base URL of the OpenAI compatible chat/transcription API.
    #[arg(long)]
    llm_url: Option<String>,

    /// Chat model used for tagging, translation and the assistant.
    #[arg(long)]
    llm_model: Option<String>,

    /// Model used for voice note transcription.
    #[arg(long)]
    transcription_model: Option<String>,

    /// CORS allowed origins, comma separated. Allows any origin when unset.
    #[arg(long)]
    cors_allowed_origins: Option<String>,
}

/// Implement a getter method on [StartArgs], using the `$var` environment variable as a fallback
/// and either panic or default if neither the argument nor the environment variable is set.
macro_rules! arg {
    ($id:ident, $var:literal, panic $msg:literal) => {
        impl StartArgs {
            pub fn $id(&self) -> String {
                match &self.$id {
                    Some(val) => val.to_string(),
                    None => match std::env::var($var) {
                        Ok(val) => val,
                        Err(_) => panic!($msg),
                    },
                }
            }
        }
    };
    ($id:ident, $var:literal, default $value:expr) => {
        impl StartArgs {
            pub fn $id(&self) -> String {
                match &self.$id {
                    Some(val) => val.to_string(),
                    None => match std::env::var($var) {
                        Ok(val) => val,
                        Err(_) => $value,
                    },
                }
            }
        }
    };
}

impl StartArgs {
    /// Returns `None` when any origin is allowed.
    pub fn allowed_origins(&self) -> Option<Vec<String>> {
        let origins = match &self.cors_allowed_origins {
            Some(origins) => origins.clone(),
            None => std::env::var("CORS_ALLOWED_ORIGINS").ok()?,
        };
        Some(
            origins
                .split(',')
                .filter_map(|o| (!o.is_empty() && o != "*").then_some(String::from(o)))
                .collect(),
        )
        .filter(|o: &Vec<String>| !o.is_empty())
    }

    pub fn llm_api_key(&self) -> String {
        std::env::var("LLM_API_KEY").expect("Missing LLM_API_KEY in env")
    }
}

arg!(log,                 "RUST_LOG",            default "info".to_string());
arg!(upload_path,         "UPLOAD_PATH",         default DEFAULT_UPLOAD_PATH.to_string());
arg!(address,             "ADDRESS",             default DEFAULT_ADDRESS.to_string());
arg!(llm_url,             "LLM_URL",             default DEFAULT_LLM_URL.to_string());
arg!(llm_model,           "LLM_MODEL",           default DEFAULT_LLM_MODEL.to_string());
arg!(transcription_model, "TRANSCRIPTION_MODEL", default DEFAULT_TRANSCRIPTION_MODEL.to_string());
