//! Remote output relay with prompt restyling.
//!
//! Output is read in chunks of at most [`CHUNK_SIZE`] bytes. Each chunk is
//! scanned on its own: a prompt split across two reads is passed through
//! unstyled.

use std::borrow::Cow;

use log::{debug, trace};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::channel::{EscapePrefix, PromptDetector, PromptStyle, PromptTheme};
use crate::error::{RelayError, Result};

/// Maximum number of bytes handled per read.
pub const CHUNK_SIZE: usize = 1024;

/// Copies remote output to the local display, restyling shell prompts.
#[derive(Debug, Clone)]
pub struct OutputTransformer {
    detector: PromptDetector,
    style: PromptStyle,
    symbol: String,
    theme: PromptTheme,
    chunk_size: usize,
}

impl OutputTransformer {
    /// Create a transformer.
    pub fn new(
        detector: PromptDetector,
        style: PromptStyle,
        symbol: impl Into<String>,
        theme: PromptTheme,
    ) -> Self {
        Self {
            detector,
            style,
            symbol: symbol.into(),
            theme,
            chunk_size: CHUNK_SIZE,
        }
    }

    /// Override the read size. Zero is treated as one.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// The read size.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Restyle the first prompt in `chunk`.
    ///
    /// Chunks without a prompt come back borrowed and byte-identical.
    pub fn transform<'a>(&self, chunk: &'a [u8]) -> Cow<'a, [u8]> {
        self.detector.rewrite(chunk, |found| {
            trace!(
                "output: restyling prompt user={:?} path={:?} at {:?} after {}",
                found.user_str(),
                found.path_str(),
                found.span,
                self.detector
                    .matched_prefix(found)
                    .map_or("no prefix", EscapePrefix::name)
            );
            self.style
                .render(found.user, found.path, &self.symbol, &self.theme)
        })
    }

    /// Relay `source` into `sink` until `source` reaches end of stream.
    ///
    /// Every chunk is flushed as soon as it is written. The first read or
    /// write failure ends the relay.
    pub async fn run<R, W>(&self, source: &mut R, sink: &mut W) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut chunk = vec![0u8; self.chunk_size];
        let mut total = 0usize;
        let mut prompts = 0usize;

        loop {
            let read = source
                .read(&mut chunk)
                .await
                .map_err(RelayError::OutputRead)?;
            if read == 0 {
                debug!(
                    "output: end of stream after {} bytes, {} prompts restyled",
                    total, prompts
                );
                return Ok(());
            }
            total += read;

            let out = self.transform(&chunk[..read]);
            if matches!(out, Cow::Owned(_)) {
                prompts += 1;
            }

            sink.write_all(&out)
                .await
                .map_err(RelayError::OutputWrite)?;
            sink.flush().await.map_err(RelayError::OutputWrite)?;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use tokio_test::io::Builder;

    use super::*;
    use crate::error::Error;

    fn transformer() -> OutputTransformer {
        OutputTransformer::new(
            PromptDetector::new().unwrap(),
            PromptStyle::new("\\u:\\w\\p"),
            ">",
            PromptTheme::plain(),
        )
    }

    #[test]
    fn test_transform_passthrough_borrows() {
        let out = transformer().transform(b"\x1b[1;32mtotal 0\x1b[0m\r\n");
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(&out[..], b"\x1b[1;32mtotal 0\x1b[0m\r\n");
    }

    #[test]
    fn test_transform_prompt() {
        let out = transformer().transform(b"done\r\nroot@abc:/tmp# ");
        assert_eq!(&out[..], b"done\r\nroot:/tmp> ");
    }

    #[tokio::test]
    async fn test_shell_prompts() {
        use crate::channel::{DEFAULT_STYLE, DEFAULT_SYMBOL};

        let listing = "bin   docker-entrypoint.d   home   media  proc\tsbin  tmp\n\
                       boot  docker-entrypoint.sh  lib    mnt\t  root\tsrv   usr\n\
                       dev   etc\t\t    lib64  opt\t  run\tsys   var\n";
        let cases: Vec<(&str, String, &str, &str, String)> = vec![
            (
                "bash prompt after bracketed paste",
                "\x1b[?2004hroot@4ac0a1a3eb6c:/# ".into(),
                DEFAULT_STYLE,
                DEFAULT_SYMBOL,
                "\x1b[?2004h👨 root ~> 📂/\r\n> ".into(),
            ),
            (
                "window title without escape",
                "]0;root@e80dbcfcaa55: /srv/app\x07root@e80dbcfcaa55:/srv/app#".into(),
                DEFAULT_STYLE,
                DEFAULT_SYMBOL,
                "]0;root@e80dbcfcaa55: /srv/app\x07👨 root ~> 📂/srv/app\r\n>".into(),
            ),
            (
                "window title",
                "\x1b]0;root@e80dbcfcaa55: /srv/app\x07root@e80dbcfcaa55:/srv/app#".into(),
                DEFAULT_STYLE,
                DEFAULT_SYMBOL,
                "\x1b]0;root@e80dbcfcaa55: /srv/app\x07👨 root ~> 📂/srv/app\r\n>".into(),
            ),
            (
                "prompt after a directory listing",
                format!("{listing}\x1b[?2004hroot@f29ec6f0d5a5:/# "),
                DEFAULT_STYLE,
                DEFAULT_SYMBOL,
                format!("{listing}\x1b[?2004h👨 root ~> 📂/\r\n> "),
            ),
            ("sh prompt", "#".into(), DEFAULT_STYLE, DEFAULT_SYMBOL, "#".into()),
            ("enter key", "\n# ".into(), DEFAULT_STYLE, DEFAULT_SYMBOL, "\n# ".into()),
            (
                "custom style and symbol",
                "\x1b[?2004hroot@4ac0a1a3eb6c:/# ".into(),
                "\\u@\\w:\\p",
                "$",
                "\x1b[?2004hroot@/:$ ".into(),
            ),
            (
                "unknown escapes stay literal",
                "\x1b[?2004hroot@4ac0a1a3eb6c:/# ".into(),
                "\\u@\\w:\\p\\r\\t",
                "$",
                "\x1b[?2004hroot@/:$\\r\\t ".into(),
            ),
        ];

        for (name, input, style, symbol, expected) in cases {
            let transformer = OutputTransformer::new(
                PromptDetector::new().unwrap(),
                PromptStyle::new(style),
                symbol,
                PromptTheme::plain(),
            );
            let mut source = input.as_bytes();
            let mut sink = Vec::new();
            transformer.run(&mut source, &mut sink).await.unwrap();
            assert_eq!(String::from_utf8(sink).unwrap(), expected, "{}", name);
        }
    }

    #[test]
    fn test_non_utf8_path_is_copied_verbatim() {
        let transformer = OutputTransformer::new(
            PromptDetector::new().unwrap(),
            PromptStyle::new("\\w\\p"),
            "#",
            PromptTheme::plain(),
        );
        let out = transformer.transform(b"root@box:/tmp/\xff# ");
        assert_eq!(&out[..], b"/tmp/\xff# ");
    }

    #[test]
    fn test_chunk_size_floor() {
        assert_eq!(transformer().with_chunk_size(0).chunk_size(), 1);
        assert_eq!(transformer().chunk_size(), CHUNK_SIZE);
    }

    #[tokio::test]
    async fn test_empty_stream_ends_cleanly() {
        let mut source = Builder::new().build();
        let mut sink = Vec::new();
        transformer().run(&mut source, &mut sink).await.unwrap();
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_binary_bytes_pass_through() {
        let data: Vec<u8> = (0u8..=255).collect();
        let mut source = Builder::new().read(&data).build();
        let mut sink = Vec::new();
        transformer().run(&mut source, &mut sink).await.unwrap();
        assert_eq!(sink, data);
    }

    #[tokio::test]
    async fn test_each_chunk_is_scanned() {
        let mut source = Builder::new()
            .read(b"a@h:/x# ")
            .read(b"ls\r\nb@h:/y# ")
            .build();
        let mut sink = Vec::new();
        transformer().run(&mut source, &mut sink).await.unwrap();
        assert_eq!(sink, b"a:/x> ls\r\nb:/y> ");
    }

    #[tokio::test]
    async fn test_prompt_split_across_reads_is_not_restyled() {
        let mut source = Builder::new().read(b"root@abc:/tm").read(b"p# ").build();
        let mut sink = Vec::new();
        transformer().run(&mut source, &mut sink).await.unwrap();
        assert_eq!(sink, b"root@abc:/tmp# ");
    }

    #[tokio::test]
    async fn test_reads_are_bounded_by_chunk_size() {
        let mut source = Builder::new().read(b"abcdefgh").build();
        let mut sink = Builder::new()
            .write(b"abc")
            .write(b"def")
            .write(b"gh")
            .build();
        transformer()
            .with_chunk_size(3)
            .run(&mut source, &mut sink)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_read_error() {
        let mut source = Builder::new()
            .read(b"partial")
            .read_error(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
            .build();
        let mut sink = Vec::new();
        let err = transformer().run(&mut source, &mut sink).await.unwrap_err();
        assert!(matches!(err, Error::Relay(RelayError::OutputRead(_))));
        assert_eq!(sink, b"partial");
    }

    #[tokio::test]
    async fn test_write_error() {
        let mut source = Builder::new().read(b"hello").build();
        let mut sink = Builder::new()
            .write_error(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            .build();
        let err = transformer().run(&mut source, &mut sink).await.unwrap_err();
        assert!(matches!(err, Error::Relay(RelayError::OutputWrite(_))));
    }
}
