//! Destructive bulk masking of persisted records.
//!
//! The runner walks every persisted type, masks every record, and writes the
//! masked columns back with one update per record. It refuses to start in a
//! production environment or without a persistence layer.
//!
//! The pass is single-threaded and sequential, in the order the repository
//! lists its records. There is no checkpointing: a run either completes or
//! stops where it failed.

mod environment;
mod report;

use std::process::ExitCode;

use serde_json::Value;
use slog::{crit, debug, info, o, warn, Discard, Logger};

pub use environment::{Environment, ENVIRONMENT_VARIABLES};
pub use report::{RecordOutcome, RecordReport, RunReport, TypeReport, TypeStatus};

use crate::{
    error::{MaskError, MaskResult, StoreError},
    maskable::{FieldMap, Maskable},
    subject::MaskSubject,
};

// =============================================================================
// Collaborators
// =============================================================================

/// Storage for the records of one maskable type.
pub trait Repository {
    type Record: Maskable;

    /// Whether the backing table or collection exists.
    fn exists(&self) -> bool;

    fn count(&self) -> Result<u64, StoreError>;

    /// Every record, in a stable order.
    fn list_all(&self) -> Result<Vec<Self::Record>, StoreError>;

    /// Writes all `fields` of one record, or nothing at all.
    fn update_by_id(&self, id: &Value, fields: &FieldMap) -> Result<(), StoreError>;
}

/// Object-safe view of a [`Repository`], so types can be mixed in one run.
pub trait MaskTarget {
    fn type_name(&self) -> &str;

    fn storage_exists(&self) -> bool;

    /// Masks and persists every record of this type.
    fn mask_records(&self, logger: &Logger) -> TypeReport;
}

impl<R> MaskTarget for R
where
    R: Repository,
{
    fn type_name(&self) -> &str {
        R::Record::mask_registry().type_name()
    }

    fn storage_exists(&self) -> bool {
        self.exists()
    }

    fn mask_records(&self, logger: &Logger) -> TypeReport {
        let type_name = MaskTarget::type_name(self);
        if R::Record::mask_registry().is_empty() {
            return TypeReport::new(type_name, TypeStatus::NoMaskableAttributes);
        }

        let enumeration = |source: StoreError| MaskError::Enumeration {
            type_name: type_name.to_string(),
            source,
        };
        let total = match self.count() {
            Ok(0) => return TypeReport::new(type_name, TypeStatus::NoRecords),
            Ok(total) => total,
            Err(source) => return TypeReport::new(type_name, TypeStatus::Aborted(enumeration(source))),
        };
        let records = match self.list_all() {
            Ok(records) => records,
            Err(source) => return TypeReport::new(type_name, TypeStatus::Aborted(enumeration(source))),
        };

        info!(logger, "masking records"; "count" => total);
        let mut report = TypeReport::new(type_name, TypeStatus::Masked);
        for (index, record) in records.iter().enumerate() {
            let id = record.record_id();
            let label = id.as_ref().map_or_else(|| "?".to_string(), display_id);
            let outcome = match mask_record(self, type_name, id.as_ref(), record) {
                Ok(columns) => {
                    debug!(logger, "record masked"; "index" => index + 1, "id" => &label, "columns" => columns);
                    RecordOutcome::Updated { columns }
                }
                Err(err) => {
                    warn!(logger, "record not masked"; "index" => index + 1, "id" => &label, "error" => %err);
                    RecordOutcome::Failed(err)
                }
            };
            report.records.push(RecordReport { id: label, outcome });
        }
        report
    }
}

fn mask_record<R: Repository>(
    repository: &R,
    type_name: &str,
    id: Option<&Value>,
    record: &R::Record,
) -> MaskResult<usize> {
    let failed = |source: StoreError| MaskError::PerRecordUpdateFailed {
        type_name: type_name.to_string(),
        id: id.map_or_else(|| "?".to_string(), display_id),
        source,
    };
    let id = id.ok_or_else(|| failed("record has no identity key".into()))?;
    let fields = record.masked_fields()?;
    repository.update_by_id(id, &fields).map_err(failed)?;
    Ok(fields.len())
}

fn display_id(id: &Value) -> String {
    match id {
        Value::String(id) => id.clone(),
        other => other.to_string(),
    }
}

/// The set of persisted types known to the application.
pub trait Persistence {
    /// Whether the store can be reached at all.
    fn is_available(&self) -> bool {
        true
    }

    fn targets(&self) -> Vec<&dyn MaskTarget>;
}

/// A [`Persistence`] built by registering repositories one by one.
#[derive(Default)]
pub struct Catalog {
    targets: Vec<Box<dyn MaskTarget>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with<R>(mut self, repository: R) -> Self
    where
        R: Repository + 'static,
    {
        self.register(repository);
        self
    }

    pub fn register<R>(&mut self, repository: R)
    where
        R: Repository + 'static,
    {
        self.targets.push(Box::new(repository));
    }
}

impl Persistence for Catalog {
    fn targets(&self) -> Vec<&dyn MaskTarget> {
        self.targets.iter().map(AsRef::as_ref).collect()
    }
}

// =============================================================================
// BulkMasker
// =============================================================================

/// Guarded, one-shot masking of every persisted record.
pub struct BulkMasker {
    environment: Environment,
    logger: Logger,
}

impl BulkMasker {
    /// A runner that logs nothing.
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            logger: Logger::root(Discard, o!()),
        }
    }

    /// A runner for the environment named by [`Environment::from_env`].
    pub fn from_env() -> Self {
        Self::new(Environment::from_env())
    }

    #[must_use]
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Rejects the run before anything is read or written.
    pub fn check<'p>(
        &self,
        persistence: Option<&'p dyn Persistence>,
    ) -> MaskResult<&'p dyn Persistence> {
        let persistence = persistence
            .filter(|persistence| persistence.is_available())
            .ok_or(MaskError::PersistenceUnavailable)?;
        if self.environment.is_production() {
            return Err(MaskError::EnvironmentGuardRejected {
                environment: self.environment.name().to_string(),
            });
        }
        Ok(persistence)
    }

    /// Masks every record of every type with backing storage.
    ///
    /// Per-record failures are reported and the pass continues; a type whose
    /// records cannot be enumerated is aborted on its own.
    pub fn run(&self, persistence: Option<&dyn Persistence>) -> MaskResult<RunReport> {
        let persistence = self.check(persistence)?;
        let mut run = RunReport::default();
        for target in persistence.targets() {
            let logger = self.logger.new(o!("type" => target.type_name().to_string()));
            let report = if target.storage_exists() {
                target.mask_records(&logger)
            } else {
                TypeReport::new(target.type_name(), TypeStatus::NoStorage)
            };
            match &report.status {
                TypeStatus::Masked => info!(
                    logger, "type masked";
                    "updated" => report.updated(), "failed" => report.failed()
                ),
                TypeStatus::Aborted(err) => warn!(logger, "type aborted"; "error" => %err),
                status => info!(logger, "type skipped"; "reason" => ?status),
            }
            run.types.push(report);
        }
        Ok(run)
    }

    /// Entry point for a bulk masking task: `0` once the run completes,
    /// `1` when it is rejected up front.
    pub fn execute(&self, persistence: Option<&dyn Persistence>) -> ExitCode {
        match self.run(persistence) {
            Ok(report) => {
                info!(
                    self.logger, "bulk masking complete";
                    "updated" => report.updated(), "failed" => report.failed()
                );
                ExitCode::SUCCESS
            }
            Err(err) => {
                crit!(self.logger, "bulk masking rejected"; "error" => %err);
                ExitCode::FAILURE
            }
        }
    }
}
