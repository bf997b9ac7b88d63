//! Monitor operations.
//!
//! A monitor watches a Redis instance hosted outside RedisGreen. Servers
//! hosted by RedisGreen are monitored already, so creating one for them is
//! redundant.

use crate::client::{member_path, RedisGreenClient};
use crate::error::Result;
use crate::http::Transport;
use crate::types::{CreateMonitor, Monitor};

impl<T: Transport> RedisGreenClient<T> {
    pub fn list_monitors(&self) -> Result<Vec<Monitor>> {
        self.get("/monitors")
    }

    /// Create a monitor. A malformed URL is rejected by the service and its
    /// message is returned as-is.
    pub fn create_monitor(&self, input: &CreateMonitor) -> Result<Monitor> {
        self.post("/monitors", input)
    }

    pub fn get_monitor(&self, id: &str) -> Result<Monitor> {
        self.get(&member_path("monitors", id)?)
    }

    pub fn delete_monitor(&self, id: &str) -> Result<()> {
        self.delete(&member_path("monitors", id)?)
    }
}
