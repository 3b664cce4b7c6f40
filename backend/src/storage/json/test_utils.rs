//! Helpers shared by storage-backed tests.

use tempfile::TempDir;

use super::connection::JsonConnection;

/// A fresh connection over a temporary data directory. The directory lives
/// as long as the returned guard, so keep it bound in the test.
pub fn temp_connection() -> (TempDir, JsonConnection) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let connection = JsonConnection::new(dir.path()).expect("failed to open connection");
    (dir, connection)
}
