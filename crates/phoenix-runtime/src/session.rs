//! PHOENIX session: construction-time resolution plus supervised runs.
//!
//! [`Session::open`] decides the accelerator, resolves the binary and stores
//! the outcome as a [`BinaryState`]. [`Session::run`] launches one simulation
//! per call and reports everything through the session's
//! [`SessionReporter`]. Neither returns an error; failures are reported and
//! reflected in the returned state.

use phoenix_core::ports::{AcceleratorProbePort, ArtifactFetcher, NoticeLevel, SessionReporter};
use phoenix_core::{
    Acceleration, DEFAULT_RESULT_DIR_RELATIVE, PROJECT_HELP, Platform, Precision, RunConfig,
    SessionOptions, VariantSignature, ensure_directory, phoenix_path_from_env,
    resolve_result_dir, resolve_search_root,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::detect::{AccelerationDecision, NvidiaSmiProbe, decide_acceleration};
use crate::env::run_overrides;
use crate::fetch::HttpFetcher;
use crate::invocation::PhoenixCommandBuilder;
use crate::reporter::TerminalReporter;
use crate::resolve::{Resolution, ResolutionSource, Resolver};
use crate::stream::{ProgressFilter, drain_to_string, read_lines_lossy};

/// Whether the session has a runnable binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BinaryState {
    Resolved(Resolution),
    Unavailable { reason: String },
}

/// Result of [`Session::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The simulation exited with status 0.
    Completed,
    /// No binary was resolved; nothing was spawned.
    Unavailable,
    /// The process could not be started.
    LaunchFailed { reason: String },
    /// The simulation exited with a non-zero status.
    Failed { code: Option<i32>, stderr: String },
}

impl RunOutcome {
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Builder for [`Session`] with replaceable adapters.
pub struct SessionBuilder {
    options: SessionOptions,
    probe: Option<Arc<dyn AcceleratorProbePort>>,
    fetcher: Option<Arc<dyn ArtifactFetcher>>,
    reporter: Option<Arc<dyn SessionReporter>>,
}

impl SessionBuilder {
    pub fn new(options: SessionOptions) -> Self {
        Self {
            options,
            probe: None,
            fetcher: None,
            reporter: None,
        }
    }

    #[must_use]
    pub fn probe(mut self, probe: Arc<dyn AcceleratorProbePort>) -> Self {
        self.probe = Some(probe);
        self
    }

    #[must_use]
    pub fn fetcher(mut self, fetcher: Arc<dyn ArtifactFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    #[must_use]
    pub fn reporter(mut self, reporter: Arc<dyn SessionReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Detect the accelerator and resolve the binary.
    pub async fn open(self) -> Session {
        let options = self.options;
        let probe = self
            .probe
            .unwrap_or_else(|| Arc::new(NvidiaSmiProbe::new()) as Arc<dyn AcceleratorProbePort>);
        let fetcher = self
            .fetcher
            .unwrap_or_else(|| Arc::new(HttpFetcher::new().with_progress(true)) as Arc<dyn ArtifactFetcher>);
        let reporter = self
            .reporter
            .unwrap_or_else(|| Arc::new(TerminalReporter::new()) as Arc<dyn SessionReporter>);

        let decision = detect(&options.platform, options.use_gpu, probe).await;
        for warning in &decision.warnings {
            reporter.notice(NoticeLevel::Warning, warning);
        }

        let signature = VariantSignature::new(
            Acceleration::from_gpu_flag(decision.use_gpu),
            options.precision,
            options.sfml,
        );
        debug!(%signature, has_gpu = decision.has_gpu, "variant selected");

        let result_path = match resolve_result_dir(options.result_path.as_deref()) {
            Ok(path) => path,
            Err(e) => {
                warn!(error = %e, "could not make result path absolute");
                options
                    .result_path
                    .clone()
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_RESULT_DIR_RELATIVE))
            }
        };

        let resolver = Resolver::new(
            signature,
            options.platform.clone(),
            &result_path,
            fetcher,
            Arc::clone(&reporter),
        )
        .release_base_url(options.release_base_url.clone())
        .debug(options.debug);

        let env_hint = phoenix_path_from_env();
        let resolved = match resolve_search_root(options.hint_path.as_deref(), env_hint.as_deref())
        {
            Ok(root) => {
                debug!(root = %root.path.display(), source = ?root.source, "search root");
                resolver.resolve(&root.path).await
            }
            Err(e) => {
                warn!(error = %e, "no search root, skipping local search");
                resolver.download_fallback().await.map(|path| Resolution {
                    path,
                    source: ResolutionSource::Downloaded,
                })
            }
        };

        let binary = match resolved {
            Ok(resolution) => BinaryState::Resolved(resolution),
            Err(e) => BinaryState::Unavailable {
                reason: e.to_string(),
            },
        };

        Session {
            signature,
            has_gpu: decision.has_gpu,
            gpu_id: options.gpu_id,
            debug: options.debug,
            platform: options.platform,
            result_path,
            binary,
            reporter,
        }
    }
}

/// Run the probe off the async executor; `nvidia-smi` can take a while.
async fn detect(
    platform: &Platform,
    requested: bool,
    probe: Arc<dyn AcceleratorProbePort>,
) -> AccelerationDecision {
    let platform_for_probe = platform.clone();
    match tokio::task::spawn_blocking(move || {
        decide_acceleration(&platform_for_probe, requested, probe.as_ref())
    })
    .await
    {
        Ok(decision) => decision,
        Err(e) => {
            warn!(error = %e, "accelerator probe task failed");
            let mut decision = AccelerationDecision {
                use_gpu: requested && platform.supports_accelerator(),
                has_gpu: false,
                warnings: Vec::new(),
            };
            if decision.use_gpu {
                decision.warnings.push(
                    "GPU requested but GPU not detected, falling back to CPU simulation."
                        .to_string(),
                );
            }
            decision
        }
    }
}

/// A configured PHOENIX launcher.
pub struct Session {
    signature: VariantSignature,
    has_gpu: bool,
    gpu_id: u32,
    debug: bool,
    platform: Platform,
    result_path: PathBuf,
    binary: BinaryState,
    reporter: Arc<dyn SessionReporter>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("signature", &self.signature)
            .field("has_gpu", &self.has_gpu)
            .field("gpu_id", &self.gpu_id)
            .field("result_path", &self.result_path)
            .field("binary", &self.binary)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Open a session with the default adapters.
    pub async fn open(options: SessionOptions) -> Self {
        SessionBuilder::new(options).open().await
    }

    pub fn builder(options: SessionOptions) -> SessionBuilder {
        SessionBuilder::new(options)
    }

    /// Absolute output directory.
    pub fn result_path(&self) -> &Path {
        &self.result_path
    }

    pub const fn is_available(&self) -> bool {
        matches!(self.binary, BinaryState::Resolved(_))
    }

    pub fn binary_path(&self) -> Option<&Path> {
        match &self.binary {
            BinaryState::Resolved(resolution) => Some(&resolution.path),
            BinaryState::Unavailable { .. } => None,
        }
    }

    pub const fn binary_state(&self) -> &BinaryState {
        &self.binary
    }

    pub const fn variant(&self) -> VariantSignature {
        self.signature
    }

    pub fn uses_gpu(&self) -> bool {
        self.signature.acceleration == Acceleration::Gpu
    }

    /// Whether an accelerator was detected at construction.
    pub const fn has_gpu(&self) -> bool {
        self.has_gpu
    }

    pub const fn gpu_id(&self) -> u32 {
        self.gpu_id
    }

    pub const fn precision(&self) -> Precision {
        self.signature.precision
    }

    pub const fn sfml(&self) -> bool {
        self.signature.sfml
    }

    pub const fn debug(&self) -> bool {
        self.debug
    }

    /// Launch one simulation with `config` and wait for it to finish.
    pub async fn run(&self, config: &RunConfig) -> RunOutcome {
        let BinaryState::Resolved(resolution) = &self.binary else {
            self.reporter.notice(
                NoticeLevel::Error,
                &format!("PHOENIX binary is missing. {PROJECT_HELP}"),
            );
            return RunOutcome::Unavailable;
        };

        if let Err(e) = ensure_directory(&self.result_path) {
            self.reporter.notice(NoticeLevel::Error, &e.to_string());
            return RunOutcome::LaunchFailed {
                reason: e.to_string(),
            };
        }

        let binary_dir = resolution.path.parent().unwrap_or_else(|| Path::new("."));
        let builder = PhoenixCommandBuilder::new(&resolution.path, &self.result_path)
            .config(config)
            .sfml(self.signature.sfml)
            .envs(run_overrides(&self.platform, binary_dir, self.gpu_id));

        let command_line = builder.command_line();
        debug!(command = %command_line, "launching PHOENIX");
        if self.debug {
            self.reporter
                .notice(NoticeLevel::Info, &format!("Running: {command_line}"));
        }

        let mut child = match builder.build().spawn() {
            Ok(child) => child,
            Err(e) => {
                let reason = format!("failed to start {}: {e}", resolution.path.display());
                self.reporter
                    .notice(NoticeLevel::Error, &format!("{reason}. {PROJECT_HELP}"));
                return RunOutcome::LaunchFailed { reason };
            }
        };

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let reporter = self.reporter.as_ref();
        let verbose = self.debug;

        let consume_stdout = async move {
            let Some(stdout) = stdout else { return };
            let mut filter = ProgressFilter::new();
            read_lines_lossy(stdout, |line| {
                if verbose {
                    reporter.line(&line);
                } else if let Some(block) = filter.push(&line) {
                    reporter.progress_block(&block);
                }
            })
            .await;
            if !filter.pending().is_empty() {
                debug!(lines = filter.pending().len(), "discarding incomplete progress block");
            }
        };
        let drain_stderr = async move {
            match stderr {
                Some(stderr) => drain_to_string(stderr).await,
                None => String::new(),
            }
        };

        let ((), stderr_text) = tokio::join!(consume_stdout, drain_stderr);

        let status = match child.wait().await {
            Ok(status) => status,
            Err(e) => {
                let reason = format!("failed to wait for PHOENIX: {e}");
                self.reporter.notice(NoticeLevel::Error, &reason);
                return RunOutcome::LaunchFailed { reason };
            }
        };

        if status.success() {
            debug!("PHOENIX finished");
            return RunOutcome::Completed;
        }

        debug!(%status, "PHOENIX exited with failure");
        self.reporter.notice(
            NoticeLevel::Error,
            &format!("Something went wrong. {PROJECT_HELP}"),
        );
        self.reporter
            .notice(NoticeLevel::Error, "Please check the error output:");
        self.reporter.notice(NoticeLevel::Error, &stderr_text);

        RunOutcome::Failed {
            code: status.code(),
            stderr: stderr_text,
        }
    }
}
