use tessera_engine::RenderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TilemapError {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("tile sheet index {0} is out of range")]
    SheetIndex(usize),

    #[error("tile size must be positive")]
    TileSize,

    #[error("tilemap has been disposed")]
    Disposed,
}
