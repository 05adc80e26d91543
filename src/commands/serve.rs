use crate::services::serve::{self, ServeConfig};

pub fn handle_serve() -> anyhow::Result<()> {
    let cfg = ServeConfig::from_env()?;
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    rt.block_on(serve::run(cfg))
}
