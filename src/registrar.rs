//! Registration orchestration.
//!
//! A [`Registrar`] walks one metadata tarball through a fixed sequence of
//! [`Stage`]s and reports a single [`RegistrationOutcome`]. Each stage is a
//! hard gate: the first failure is logged once and ends the run with exit
//! status 1.

use std::fmt;
use std::io::Write;
use std::path::PathBuf;

use crate::classify::{Classification, HostReleaseProbe, ReleaseProbe};
use crate::config::Settings;
use crate::environment::{BashScriptSource, Environment, ScriptSource};
use crate::error::{RegistrarError, Result};
use crate::extract::{MetadataExtractor, MetadataLayout};
use crate::registration::{
    CurlTransport, HttpTransport, RegistrationClient, RegistrationRequest, Transport,
};
use crate::tags::build_tags;

/// Steps of a registration run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ValidateInputs,
    LoadPreEnv,
    ExtractArchive,
    SourcePostScript,
    LoadPostEnv,
    LogObservedEnv,
    BuildRequest,
    Register,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::ValidateInputs => "validate-inputs",
            Stage::LoadPreEnv => "load-pre-env",
            Stage::ExtractArchive => "extract-archive",
            Stage::SourcePostScript => "source-post-script",
            Stage::LoadPostEnv => "load-post-env",
            Stage::LogObservedEnv => "log-observed-env",
            Stage::BuildRequest => "build-request",
            Stage::Register => "register",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Result of a registration run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationOutcome {
    /// Whether the image was registered.
    pub success: bool,

    /// Process exit status (0 for success, 1 for any failure).
    pub exit_code: i32,
}

impl RegistrationOutcome {
    /// Create a successful outcome.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failed outcome.
    pub fn failure() -> Self {
        Self {
            success: false,
            exit_code: 1,
        }
    }
}

/// Registers the image described by one metadata tarball.
///
/// The collaborators that cross a process boundary (script sourcing,
/// release probing, the HTTP transport) are replaceable for tests.
pub struct Registrar {
    tarball: Option<PathBuf>,
    env: Environment,
    extractor: MetadataExtractor,
    script_source: Box<dyn ScriptSource>,
    release_probe: Box<dyn ReleaseProbe>,
    transport: Option<Box<dyn Transport>>,
}

impl Registrar {
    /// Create a registrar for `tarball` starting from `env`.
    pub fn new(tarball: Option<PathBuf>, env: Environment) -> Self {
        Self {
            tarball,
            env,
            extractor: MetadataExtractor::new(),
            script_source: Box::new(BashScriptSource::new()),
            release_probe: Box::new(HostReleaseProbe),
            transport: None,
        }
    }

    /// Use a different archive extractor.
    pub fn with_extractor(mut self, extractor: MetadataExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Use a different script source for the post-extraction script.
    pub fn with_script_source(mut self, source: Box<dyn ScriptSource>) -> Self {
        self.script_source = source;
        self
    }

    /// Use a different release probe for distribution detection.
    pub fn with_release_probe(mut self, probe: Box<dyn ReleaseProbe>) -> Self {
        self.release_probe = probe;
        self
    }

    /// Send the registration through `transport` instead of choosing one
    /// from the environment.
    pub fn with_transport(mut self, transport: Box<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Run every stage, writing the registration response to `out`.
    pub fn run(self, out: &mut dyn Write) -> RegistrationOutcome {
        match self.try_run(out) {
            Ok(()) => RegistrationOutcome::success(),
            Err(e) => {
                tracing::error!("{}", failure_message(&e));
                RegistrationOutcome::failure()
            }
        }
    }

    fn try_run(self, out: &mut dyn Write) -> Result<()> {
        let Registrar {
            tarball,
            env,
            extractor,
            script_source,
            release_probe,
            transport,
        } = self;

        enter(Stage::ValidateInputs);
        let tarball = tarball.ok_or(RegistrarError::MissingTarball)?;
        let layout = MetadataLayout::new(&tarball);

        enter(Stage::LoadPreEnv);
        let env = env.merge_dir(&layout.pre_env_dir())?;
        Settings::from_env(&env)?;
        if !tarball.exists() {
            return Err(RegistrarError::TarballNotFound { path: tarball });
        }

        enter(Stage::ExtractArchive);
        extractor.extract(&layout)?;

        enter(Stage::SourcePostScript);
        let script = layout.register_script();
        let env = if script.exists() {
            match env.clone().merge_script(&script, script_source.as_ref()) {
                Ok(env) => env,
                Err(e) => {
                    tracing::warn!("failed to source {}: {}", script.display(), e);
                    env
                }
            }
        } else {
            tracing::debug!("no {} to source", script.display());
            env
        };

        enter(Stage::LoadPostEnv);
        let env = env.merge_dir(&layout.post_env_dir())?;

        enter(Stage::LogObservedEnv);
        for (key, value) in env.relevant() {
            tracing::info!("{}={}", key, value);
        }

        enter(Stage::BuildRequest);
        let settings = Settings::from_env(&env)?;
        let classification = Classification::from_env(&env, release_probe.as_ref());
        let tags = build_tags(&env, &classification);
        let request = RegistrationRequest::new(classification.infra, &settings.image_name, &tags);
        tracing::debug!("classification {:?}", classification);
        tracing::debug!("request {:?}", request);

        enter(Stage::Register);
        let transport = match transport {
            Some(transport) => transport,
            None => select_transport(&settings)?,
        };
        RegistrationClient::new(transport).register(&request, &settings.images_url, out)?;

        enter(Stage::Done);
        Ok(())
    }
}

fn enter(stage: Stage) {
    tracing::debug!("stage {}", stage);
}

/// Curl when `CURL_EXE` is set, otherwise the in-process HTTP client.
fn select_transport(settings: &Settings) -> Result<Box<dyn Transport>> {
    Ok(match &settings.curl_exe {
        Some(exe) => Box::new(CurlTransport::new(exe.clone())),
        None => Box::new(HttpTransport::new()?),
    })
}

/// The single line logged when a run fails.
fn failure_message(err: &RegistrarError) -> String {
    match err {
        RegistrarError::TarballNotFound { .. } => {
            "image metadata tarball does not exist".to_string()
        }
        RegistrarError::ExtractionFailed { message, .. } => {
            format!("failed to extract image metadata tarball: {}", message)
        }
        other => other.to_string(),
    }
}
