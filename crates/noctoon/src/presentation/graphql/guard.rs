use async_graphql::{Context, Guard, Result};

use super::current_user;

pub struct AdminGuard;

impl AdminGuard {
    pub fn new() -> Self {
        Self {}
    }
}

impl Guard for AdminGuard {
    /// Checks the stored role, a token minted before a demotion does not count.
    async fn check(&self, ctx: &Context<'_>) -> Result<()> {
        if current_user(ctx).await?.is_admin() {
            return Ok(());
        }

        Err("Admin access required".into())
    }
}
