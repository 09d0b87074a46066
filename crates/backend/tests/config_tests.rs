use backend::{BackendConfig, Device, InferError, SessionOptions};
use std::path::PathBuf;
use std::time::Duration;

#[test]
fn test_device_parsing() {
    assert_eq!("AUTO".parse::<Device>().unwrap(), Device::Auto);
    assert_eq!("".parse::<Device>().unwrap(), Device::Auto);
    assert_eq!("cpu".parse::<Device>().unwrap(), Device::Cpu);
    assert_eq!("GPU".parse::<Device>().unwrap(), Device::Gpu { index: None });
    assert_eq!("gpu.1".parse::<Device>().unwrap(), Device::Gpu { index: Some(1) });
    assert_eq!("NPU".parse::<Device>().unwrap(), Device::Npu);
    assert_eq!(
        "HETERO:GPU,CPU".parse::<Device>().unwrap(),
        Device::Other("HETERO:GPU,CPU".to_string())
    );
    assert_eq!("GPU.x".parse::<Device>().unwrap(), Device::Other("GPU.x".to_string()));
}

#[test]
fn test_device_display() {
    assert_eq!(Device::default().to_string(), "AUTO");
    assert_eq!(Device::Cpu.to_string(), "CPU");
    assert_eq!(Device::Gpu { index: None }.to_string(), "GPU");
    assert_eq!(Device::Gpu { index: Some(2) }.to_string(), "GPU.2");
    assert_eq!(Device::Npu.to_string(), "NPU");
    assert_eq!(Device::from("MULTI:CPU,GPU").to_string(), "MULTI:CPU,GPU");
}

#[test]
fn test_device_display_parses_back() {
    for device in [
        Device::Auto,
        Device::Cpu,
        Device::Gpu { index: None },
        Device::Gpu { index: Some(3) },
        Device::Npu,
    ] {
        assert_eq!(Device::from(device.to_string()), device);
    }
}

#[test]
fn test_options_builder() {
    let options = SessionOptions::new()
        .with_device("CPU")
        .with_cache_dir("/tmp/models")
        .with_observer(|_: Duration| {})
        .with_progress(|_| {})
        .in_memory(true);
    assert_eq!(options.device, Device::Cpu);
    assert_eq!(options.resolve.cache_dir, Some(PathBuf::from("/tmp/models")));
    assert!(options.resolve.in_memory);
    assert!(options.observer.is_some());
    assert!(options.resolve.progress.is_some());
}

#[test]
fn test_options_default() {
    let options = SessionOptions::default();
    assert_eq!(options.device, Device::Auto);
    assert!(options.observer.is_none());
    assert!(!options.resolve.in_memory);
    assert!(format!("{:?}", options).contains("Auto"));
}

#[test]
fn test_config_full() {
    let json = r#"{ "device": "GPU.1", "cache_dir": "/var/cache/models", "in_memory": true }"#;
    let config = BackendConfig::from_json(json).unwrap();
    assert_eq!(config.device.as_deref(), Some("GPU.1"));
    assert_eq!(config.cache_dir, Some(PathBuf::from("/var/cache/models")));
    assert!(config.in_memory);

    let options = config.to_options();
    assert_eq!(options.device, Device::Gpu { index: Some(1) });
    assert_eq!(options.resolve.cache_dir, Some(PathBuf::from("/var/cache/models")));
    assert!(options.resolve.in_memory);
}

#[test]
fn test_config_defaults() {
    let config = BackendConfig::from_json("{}").unwrap();
    assert_eq!(config, BackendConfig::default());
    assert_eq!(config.to_options().device, Device::Auto);
}

#[test]
fn test_config_invalid_json() {
    assert!(matches!(
        BackendConfig::from_json(r#"{ "in_memory": "yes" }"#),
        Err(InferError::Config(_))
    ));
}

#[test]
fn test_config_from_file() {
    let path = std::env::temp_dir().join(format!("backend_config_{}.json", std::process::id()));
    std::fs::write(&path, r#"{ "device": "CPU" }"#).unwrap();
    let config = BackendConfig::from_file(&path).unwrap();
    assert_eq!(config.device.as_deref(), Some("CPU"));
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_config_missing_file() {
    assert!(matches!(
        BackendConfig::from_file("/nonexistent/backend.json"),
        Err(InferError::Io(_))
    ));
}
