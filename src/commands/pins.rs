use crate::services::github::GitHub;
use crate::services::pins::{tracked_upstreams, update_all};

pub fn handle_pins() -> anyhow::Result<()> {
    let out_dir = std::env::current_dir()?;
    update_all(&GitHub, &tracked_upstreams(), &out_dir)
}
