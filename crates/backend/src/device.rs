use std::{convert::Infallible, fmt, str::FromStr};

/// Target device of a compiled model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Device {
    /// Let the runtime pick the best available device.
    #[default]
    Auto,
    Cpu,
    Gpu { index: Option<u32> },
    Npu,
    /// Anything else (`HETERO:GPU,CPU`, `MULTI:...`, plugin names), passed through verbatim.
    Other(String),
}

impl Device {
    pub fn is_auto(&self) -> bool {
        matches!(self, Device::Auto)
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Auto => write!(f, "AUTO"),
            Device::Cpu => write!(f, "CPU"),
            Device::Gpu { index: None } => write!(f, "GPU"),
            Device::Gpu { index: Some(index) } => write!(f, "GPU.{index}"),
            Device::Npu => write!(f, "NPU"),
            Device::Other(name) => write!(f, "{name}"),
        }
    }
}

impl FromStr for Device {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let upper = trimmed.to_ascii_uppercase();
        let device = match upper.as_str() {
            "" | "AUTO" => Device::Auto,
            "CPU" => Device::Cpu,
            "GPU" => Device::Gpu { index: None },
            "NPU" => Device::Npu,
            _ => match upper.strip_prefix("GPU.").map(str::parse::<u32>) {
                Some(Ok(index)) => Device::Gpu { index: Some(index) },
                _ => Device::Other(trimmed.to_string()),
            },
        };
        Ok(device)
    }
}

impl From<&str> for Device {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(device) => device,
            Err(never) => match never {},
        }
    }
}

impl From<String> for Device {
    fn from(s: String) -> Self {
        Device::from(s.as_str())
    }
}
