//! Scripted in-memory NNTP server shared by the session tests
//!
//! A [`Script`] is a list of steps the fake server performs in order: send
//! bytes, read a command line, read a posted article, pause or close. Once
//! the steps run out the server keeps reading until the client goes away, so
//! lines the client sends afterwards (e.g. QUIT) are still recorded.

#![allow(dead_code)]

use std::time::Duration;

use nntp_engine::{NntpSession, ServerConfig};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::task::JoinHandle;

enum Step {
    Send(Vec<u8>),
    Read,
    ReadArticle,
    Pause(Duration),
    Close,
}

/// Server side of a conversation
#[derive(Default)]
pub struct Script {
    steps: Vec<Step>,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script starting with a "posting allowed" greeting
    pub fn greeting() -> Self {
        Self::new().send("200 news.example.com ready (posting ok)")
    }

    /// Send one line; CRLF is appended
    pub fn send(mut self, line: &str) -> Self {
        self.steps
            .push(Step::Send(format!("{}\r\n", line).into_bytes()));
        self
    }

    /// Send bytes exactly as given
    pub fn send_raw(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.steps.push(Step::Send(bytes.into()));
        self
    }

    /// Read one command line
    pub fn read(mut self) -> Self {
        self.steps.push(Step::Read);
        self
    }

    /// Read article lines up to the terminator; recorded joined with CRLF,
    /// still dot-stuffed
    pub fn read_article(mut self) -> Self {
        self.steps.push(Step::ReadArticle);
        self
    }

    pub fn pause(mut self, duration: Duration) -> Self {
        self.steps.push(Step::Pause(duration));
        self
    }

    /// Drop the connection
    pub fn close(mut self) -> Self {
        self.steps.push(Step::Close);
        self
    }

    /// Run the script on `stream`; the task yields every line received
    pub fn spawn<S>(self, stream: S) -> JoinHandle<Vec<String>>
    where
        S: AsyncRead + AsyncWrite + Send + Unpin + 'static,
    {
        tokio::spawn(self.run(stream))
    }

    async fn run<S>(self, stream: S) -> Vec<String>
    where
        S: AsyncRead + AsyncWrite + Send + Unpin + 'static,
    {
        let (read, mut write) = tokio::io::split(stream);
        let mut read = BufReader::new(read);
        let mut received = Vec::new();

        for step in self.steps {
            match step {
                Step::Send(bytes) => {
                    if write.write_all(&bytes).await.is_err() {
                        return received;
                    }
                    let _ = write.flush().await;
                }
                Step::Read => match read_line(&mut read).await {
                    Some(line) => received.push(line),
                    None => return received,
                },
                Step::ReadArticle => {
                    let mut article = Vec::new();
                    loop {
                        match read_line(&mut read).await {
                            Some(line) if line == "." => break,
                            Some(line) => article.push(line),
                            None => return received,
                        }
                    }
                    received.push(article.join("\r\n"));
                }
                Step::Pause(duration) => tokio::time::sleep(duration).await,
                Step::Close => return received,
            }
        }

        while let Some(line) = read_line(&mut read).await {
            received.push(line);
        }
        received
    }
}

async fn read_line<R: AsyncBufRead + Unpin>(reader: &mut R) -> Option<String> {
    let mut line = String::new();
    match reader.read_line(&mut line).await {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn test_config() -> ServerConfig {
    ServerConfig::plain("news.example.com").with_idle_timeout(Duration::from_secs(5))
}

/// Connected session talking to `script`
pub async fn connect(script: Script) -> (NntpSession, JoinHandle<Vec<String>>) {
    connect_with(test_config(), script).await
}

pub async fn connect_with(
    config: ServerConfig,
    script: Script,
) -> (NntpSession, JoinHandle<Vec<String>>) {
    init_tracing();
    let (client, server) = tokio::io::duplex(64 * 1024);
    let server = script.spawn(server);
    let mut session = NntpSession::new(config);
    session
        .connect_stream(client)
        .await
        .expect("greeting should be accepted");
    (session, server)
}

/// Close the client side and collect what the server received
pub async fn finish(session: NntpSession, server: JoinHandle<Vec<String>>) -> Vec<String> {
    drop(session);
    server.await.expect("server task panicked")
}
