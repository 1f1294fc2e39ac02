//! Local keystroke forwarding.

use log::trace;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::RelayError;

/// Forward `input` to `remote` one byte at a time.
///
/// Each byte is written and flushed before the next one is read, so line
/// editing keys and control characters such as Ctrl-C reach the remote
/// shell immediately. Bytes are never altered.
///
/// Only returns once forwarding has stopped. End of local input is
/// reported as [`RelayError::InputRead`] with
/// [`std::io::ErrorKind::UnexpectedEof`].
pub async fn forward_input<R, W>(input: &mut R, remote: &mut W) -> RelayError
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    loop {
        let byte = match input.read_u8().await {
            Ok(byte) => byte,
            Err(e) => return RelayError::InputRead(e),
        };
        trace!("input: {:#04x}", byte);

        if let Err(e) = remote.write_all(&[byte]).await {
            return RelayError::InputWrite(e);
        }
        if let Err(e) = remote.flush().await {
            return RelayError::InputWrite(e);
        }
    }
}
