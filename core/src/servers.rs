//! Server operations.

use crate::client::{member_path, RedisGreenClient};
use crate::error::Result;
use crate::http::Transport;
use crate::types::{CreateServer, Server};

impl<T: Transport> RedisGreenClient<T> {
    /// All servers owned by this account, in the order the service returns them.
    pub fn list_servers(&self) -> Result<Vec<Server>> {
        self.get("/servers")
    }

    /// Create a server. Plan and region are validated by the service, and
    /// its error is returned verbatim when either is rejected.
    pub fn create_server(&self, input: &CreateServer) -> Result<Server> {
        self.post("/servers", input)
    }

    pub fn get_server(&self, id: &str) -> Result<Server> {
        self.get(&member_path("servers", id)?)
    }

    /// Tear down a server. Its replicas keep running and must be deleted
    /// separately.
    pub fn delete_server(&self, id: &str) -> Result<()> {
        self.delete(&member_path("servers", id)?)
    }
}
