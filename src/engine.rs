use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader, Lines};
use tokio::process::{Child, ChildStdout, Command};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::{Error, Result};
use crate::parse::parse_trust_record;
use crate::types::{EngineConfig, TrustItem};

/// The two operations a trust-list enumeration needs from the engine,
/// and nothing else.
///
/// The wire format behind these calls belongs to the engine. Splitting
/// the seam here lets [`TrustQuery`] be driven by a scripted engine in
/// tests.
///
/// Calls are strictly sequential: `begin` once, then `fetch` until it
/// returns `None`. `fetch` without a preceding `begin` is a protocol
/// violation.
///
/// [`TrustQuery`]: crate::TrustQuery
pub trait TrustEngine {
    /// Begins a new trust enumeration for `pattern` with `flags`.
    fn begin(
        &mut self,
        pattern: &str,
        flags: u32,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Pulls the next trust record, or `None` once the enumeration is
    /// exhausted.
    fn fetch(&mut self) -> impl Future<Output = Result<Option<TrustItem>>> + Send;
}

#[derive(Debug)]
struct GpgSession {
    child: Child,
    lines: Lines<BufReader<ChildStdout>>,
    stderr_task: Option<JoinHandle<String>>,
}

/// Handle to a GnuPG engine session.
///
/// Opened with an explicit [`EngineConfig`]; holds at most one active
/// enumeration at a time. Dropping the handle aborts any in-flight
/// enumeration by killing the engine subprocess.
///
/// # Example
///
/// ```no_run
/// # async fn example() -> trustlist::Result<()> {
/// use trustlist::{EngineConfig, GpgEngine, TrustQuery};
///
/// let engine = GpgEngine::open(EngineConfig::default()).await?;
/// let mut query = TrustQuery::new(engine);
/// query.start("alice", 0).await?;
/// while let Some(item) = query.next().await? {
///     println!("{item}");
/// }
/// # Ok(())
/// # }
/// ```
///
/// # Engine support
///
/// Trust-path listing is a classic gpg (1.x) operation; GnuPG 2.x
/// removed the option, and a modern engine rejects it with
/// [`Error::Engine`] on the first fetch. Opening a session and the
/// query state machine work against either generation.
///
/// [`Error::Engine`]: crate::Error::Engine
#[derive(Debug)]
pub struct GpgEngine {
    config: EngineConfig,
    session: Option<GpgSession>,
}

impl GpgEngine {
    /// Opens a session with the engine for the configured protocol.
    ///
    /// Probes the engine binary once; if it cannot be executed or does
    /// not report a version, this fails with [`Error::EngineUnavailable`].
    ///
    /// [`Error::EngineUnavailable`]: crate::Error::EngineUnavailable
    pub async fn open(config: EngineConfig) -> Result<Self> {
        let program = config.engine_program();
        let probe = Command::new(program)
            .env("LC_ALL", "C")
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        match probe {
            Ok(status) if status.success() => Ok(Self {
                config,
                session: None,
            }),
            Ok(status) => Err(Error::EngineUnavailable(format!(
                "{program} exited with status {}",
                status.code().unwrap_or(-1)
            ))),
            Err(err) => Err(Error::EngineUnavailable(format!(
                "cannot execute {program}: {err}"
            ))),
        }
    }

    /// Collects the child's exit status after its stdout reached EOF.
    ///
    /// A non-zero exit maps to [`Error::Engine`] with whatever the
    /// engine wrote to stderr.
    ///
    /// [`Error::Engine`]: crate::Error::Engine
    async fn finish(&mut self) -> Result<()> {
        let Some(mut session) = self.session.take() else {
            return Ok(());
        };

        let mut stderr = String::new();
        if let Some(task) = session.stderr_task.take() {
            stderr = task.await.unwrap_or_default();
        }

        let status = session.child.wait().await?;
        if !status.success() {
            return Err(Error::Engine {
                status: status.code().unwrap_or(-1),
                stderr: stderr.trim().to_string(),
            });
        }

        if !stderr.trim().is_empty() {
            debug!(stderr = stderr.trim(), "engine stderr chatter");
        }
        Ok(())
    }

    async fn abort_session(&mut self) {
        if let Some(mut session) = self.session.take() {
            let _ = session.child.kill().await;
        }
    }
}

impl TrustEngine for GpgEngine {
    /// Spawns the engine subprocess for a fresh enumeration.
    ///
    /// A leftover session from an aborted or failed enumeration is
    /// superseded: the old subprocess is killed before the new one is
    /// spawned. A nonzero `flags` value limits the trust chain depth
    /// the engine will walk.
    async fn begin(&mut self, pattern: &str, flags: u32) -> Result<()> {
        self.abort_session().await;

        let mut cmd = Command::new(self.config.engine_program());
        cmd.env("LC_ALL", "C");
        if let Some(dir) = &self.config.homedir {
            cmd.arg(format!("--homedir={dir}"));
        }
        cmd.args(["--with-colons", "--fixed-list-mode", "--list-trust-path"]);
        if flags > 0 {
            cmd.arg("--max-cert-depth").arg(flags.to_string());
        }
        cmd.arg("--")
            .arg(pattern)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn()?;
        let stdout = child.stdout.take().ok_or(Error::StdoutCaptureFailed)?;

        // Drain stderr concurrently with the stdout stream. Holding
        // the pipe undrained until EOF can wedge a chatty engine on a
        // full pipe buffer while fetch waits on stdout.
        let stderr_task = child.stderr.take().map(|mut pipe| {
            tokio::spawn(async move {
                let mut buf = String::new();
                let _ = pipe.read_to_string(&mut buf).await;
                buf
            })
        });

        self.session = Some(GpgSession {
            child,
            lines: BufReader::new(stdout).lines(),
            stderr_task,
        });
        Ok(())
    }

    async fn fetch(&mut self) -> Result<Option<TrustItem>> {
        let Some(session) = self.session.as_mut() else {
            return Err(Error::ProtocolViolation("fetch called before begin"));
        };

        let read = loop {
            match session.lines.next_line().await {
                Ok(Some(line)) => {
                    if let Some(item) = parse_trust_record(&line) {
                        return Ok(Some(item));
                    }
                    // Non-record line; parse already logged the skip.
                }
                Ok(None) => break Ok(()),
                Err(err) => break Err(err),
            }
        };

        match read {
            Ok(()) => {
                self.finish().await?;
                Ok(None)
            }
            Err(err) => {
                self.abort_session().await;
                Err(err.into())
            }
        }
    }
}
