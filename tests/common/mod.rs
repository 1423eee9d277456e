//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use polldot::config::{MailConfig, Settings};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use url::Url;

/// Start a simple mock backend that returns a fixed body.
pub async fn start_mock_backend(response: &'static str) -> SocketAddr {
    start_programmable_backend(move || async move { (200, response.to_string()) }).await
}

/// Start a programmable mock backend with async support.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        read_request_head(&mut socket).await;
                        let (status, body) = f().await;
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Consume the request up to the blank line so closing the socket does not reset it.
async fn read_request_head(socket: &mut TcpStream) {
    let mut head = Vec::new();
    let mut buf = [0u8; 512];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => head.extend_from_slice(&buf[..n]),
        }
    }
}

/// An address nothing listens on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// How the fake mailserver behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpBehavior {
    /// Accept every message.
    Accept,
    /// Refuse every recipient with 550.
    RejectRecipient,
    /// Accept connections but never say a word.
    Silent,
}

/// A running fake mailserver.
pub struct FakeSmtp {
    pub addr: SocketAddr,
    delivered: Arc<AtomicUsize>,
}

impl FakeSmtp {
    /// Number of messages accepted so far.
    pub fn delivered(&self) -> usize {
        self.delivered.load(Ordering::SeqCst)
    }
}

/// Start a scripted SMTP server speaking just enough of the protocol.
pub async fn start_fake_smtp(behavior: SmtpBehavior) -> FakeSmtp {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let delivered = Arc::new(AtomicUsize::new(0));
    let counter = delivered.clone();

    tokio::spawn(async move {
        let mut held = Vec::new();
        loop {
            match listener.accept().await {
                Ok((socket, _)) if behavior == SmtpBehavior::Silent => held.push(socket),
                Ok((socket, _)) => {
                    let counter = counter.clone();
                    tokio::spawn(async move {
                        let _ = smtp_session(socket, behavior, counter).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    FakeSmtp { addr, delivered }
}

async fn smtp_session(
    socket: TcpStream,
    behavior: SmtpBehavior,
    delivered: Arc<AtomicUsize>,
) -> std::io::Result<()> {
    let (read, mut write) = socket.into_split();
    let mut lines = BufReader::new(read).lines();
    let mut in_data = false;

    write.write_all(b"220 polldot-test ESMTP\r\n").await?;

    while let Some(line) = lines.next_line().await? {
        if in_data {
            if line == "." {
                in_data = false;
                delivered.fetch_add(1, Ordering::SeqCst);
                write.write_all(b"250 Data ok\r\n").await?;
            }
            continue;
        }

        let verb = line.split_whitespace().next().unwrap_or("").to_ascii_uppercase();
        let reply = match verb.as_str() {
            "EHLO" | "HELO" => "250 polldot-test",
            "MAIL" => "250 Sender ok",
            "RCPT" if behavior == SmtpBehavior::RejectRecipient => "550 No such user",
            "RCPT" => "250 Receiver ok",
            "DATA" => {
                in_data = true;
                "354 Go ahead"
            }
            "RSET" | "NOOP" => "250 Ok",
            "QUIT" => {
                write.write_all(b"221 Goodbye\r\n").await?;
                return Ok(());
            }
            _ => "502 Command not implemented",
        };
        write.write_all(format!("{reply}\r\n").as_bytes()).await?;
    }

    Ok(())
}

/// Mail settings pointing at a local mailserver.
pub fn mail_config(addr: SocketAddr) -> MailConfig {
    MailConfig {
        from: "poller@example.com".to_string(),
        to: "operator@example.com".to_string(),
        subject: "mail from polldot tests".to_string(),
        body: "test run".to_string(),
        host: addr.ip().to_string(),
        port: addr.port(),
    }
}

/// Settings with an arbitrary interval, bypassing the configured minimum.
pub fn settings(url: &str, mail: MailConfig, interval: Duration) -> Settings {
    Settings {
        url: Url::parse(url).unwrap(),
        mail,
        interval,
    }
}
