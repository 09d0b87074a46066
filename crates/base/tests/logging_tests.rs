use base::logging::format_today;
use base::{init_file_logger, init_stdout_logger};
use base::log::Log;

// One test: the global logger can only be installed once per process.
#[test]
fn test_file_logger_installs_once() {
    let dir = std::env::temp_dir().join(format!("backend-global-log-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);

    init_file_logger(&dir).unwrap();
    base::log::warn!("runtime created");

    // ignored, the file logger stays installed
    init_stdout_logger();
    base::log::warn!("session compiled");
    base::log::logger().flush();

    let contents = std::fs::read_to_string(dir.join(format!("{}.log", format_today()))).unwrap();
    assert!(contents.contains("runtime created"));
    assert!(contents.contains("session compiled"));
    assert!(base::log::max_level() >= base::log::LevelFilter::Warn);

    std::fs::remove_dir_all(&dir).ok();
}
