use std::{
    pin::Pin,
    task::{Context, Poll},
};

use async_trait::async_trait;
use futures::{Stream, stream::StreamExt};
use pin_project::pin_project;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use crate::{
    error::{McpCommonsError, Result},
    protocol::message::{JsonRpcMessage, parse_json_rpc_message},
    transport::traits::ServerTransport,
};

const READ_BUFFER_CAPACITY: usize = 2 * 1024 * 1024;

#[pin_project]
/// A transport that reads and writes newline-delimited JSON-RPC messages
/// over byte streams.
pub struct ByteTransport<R, W> {
    #[pin]
    reader: BufReader<R>,
    #[pin]
    writer: W,
    // Partially read line, kept across polls until the newline arrives.
    line_buf: Vec<u8>,
}

impl<R, W> ByteTransport<R, W>
where
    R: AsyncRead,
    W: AsyncWrite,
{
    /// Creates a new `ByteTransport` with the given reader and writer.
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: BufReader::with_capacity(READ_BUFFER_CAPACITY, reader),
            writer,
            line_buf: Vec::with_capacity(READ_BUFFER_CAPACITY),
        }
    }
}

impl<R, W> Stream for ByteTransport<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    type Item = Result<JsonRpcMessage>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();

        let reader = this.reader.get_mut();
        let mut read_future = Box::pin(reader.read_until(b'\n', this.line_buf));
        match read_future.as_mut().poll(cx) {
            Poll::Ready(Ok(0)) => {
                tracing::info!("Client closed connection (read 0 bytes)");
                Poll::Ready(None)
            }
            Poll::Ready(Ok(_)) => {
                let line = match String::from_utf8(std::mem::take(this.line_buf)) {
                    Ok(s) => s,
                    Err(e) => {
                        tracing::warn!(?e, "Invalid UTF-8 line");
                        return Poll::Ready(Some(Err(McpCommonsError::Utf8(e))));
                    }
                };
                Poll::Ready(Some(parse_json_rpc_message(&line)))
            }
            Poll::Ready(Err(e)) => Poll::Ready(Some(Err(McpCommonsError::Io(e)))),
            Poll::Pending => Poll::Pending,
        }
    }
}

#[async_trait]
impl<R, W> ServerTransport for ByteTransport<R, W>
where
    R: AsyncRead + Unpin + Send + Sync,
    W: AsyncWrite + Unpin + Send + Sync,
{
    async fn read_message(&mut self) -> Option<Result<JsonRpcMessage>> {
        self.next().await
    }

    async fn write_message(&mut self, msg: JsonRpcMessage) -> Result<()> {
        let mut this = Pin::new(self).project();
        let json = serde_json::to_string(&msg)?;
        this.writer.write_all(json.as_bytes()).await?;
        this.writer.write_all(b"\n").await?;
        this.writer.flush().await?;
        Ok(())
    }
}
