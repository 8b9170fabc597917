//! Tracing initialisation

use riskwatch_sdk::telemetry::{init_tracing, DEFAULT_FILTER};
use riskwatch_sdk::{ErrorKind, LogFormat};

#[test]
fn test_init_tracing_installs_once() {
    init_tracing(DEFAULT_FILTER, LogFormat::Json).unwrap();
    tracing::info!("subscriber installed");

    let second = init_tracing(DEFAULT_FILTER, LogFormat::Text).unwrap_err();
    assert_eq!(second.kind(), ErrorKind::Config);
}
