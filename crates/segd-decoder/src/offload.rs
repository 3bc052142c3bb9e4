use std::path::PathBuf;

use crate::decoder::HeaderDecoder;
use crate::error::DecodeError;
use crate::header::Header;

impl HeaderDecoder {
    /// Decode a file's header from async code without blocking the
    /// executor.
    ///
    /// `decode_path` is a blocking read, and slow storage can stall it, so
    /// it runs on tokio's blocking pool. There is no cancellation inside a
    /// decode; wrap the future in `tokio::time::timeout` if a deadline is
    /// needed.
    ///
    /// # Errors
    ///
    /// Everything [`decode_path`](Self::decode_path) returns, plus
    /// [`DecodeError::TaskFailed`] if the blocking task panicked or the
    /// runtime shut down under it.
    pub async fn decode_path_offloaded(
        &self,
        path: impl Into<PathBuf>,
    ) -> Result<Header, DecodeError> {
        let decoder = self.clone();
        let path = path.into();
        tokio::task::spawn_blocking(move || decoder.decode_path(&path))
            .await
            .map_err(|e| DecodeError::TaskFailed(e.to_string()))?
    }
}
