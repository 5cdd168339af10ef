use civiclog::Service;
use civiclog::auth::SessionIssuer;
use civiclog::storage::{self, DynStorage};

pub const TEST_SECRET: &str = "integration-test-secret";

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[allow(dead_code)]
pub async fn memory_storage() -> DynStorage {
    init_tracing();
    storage::open("sqlite::memory:").await.unwrap()
}

#[allow(dead_code)]
pub async fn memory_service() -> Service {
    init_tracing();
    let store = storage::open("sqlite::memory:").await.unwrap();
    Service::new(store, SessionIssuer::new(TEST_SECRET))
}
