//! Simulator backend implementation.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

use qsim_hal::{
    Backend, BackendConfig, BackendFactory, Capabilities, CircuitSource, Execution,
    ExecutionOptions, ExecutionRequest, ExecutionResult, ExecutionState, HalError, HalResult,
};
use qsim_ir::Circuit;

use crate::engine::{DEFAULT_MAX_QUBITS, Engine, EngineConfig, MAX_SUPPORTED_QUBITS, NormPolicy};
use crate::sampler::{BitOrder, Sampler};

/// Default ceiling on shots per run.
pub const DEFAULT_MAX_SHOTS: u32 = 1_000_000;

/// Simulator settings, as read from a configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Widest circuit accepted.
    pub max_qubits: u32,
    /// Most shots accepted per run.
    pub max_shots: u32,
    /// Norm drift handling.
    pub norm_policy: NormPolicy,
    /// Histogram key order.
    pub bit_order: BitOrder,
    /// Sample shots on the rayon pool.
    pub parallel_sampling: bool,
    /// Seed used when a request carries none.
    pub seed: Option<u64>,
    /// Per-run wall-clock budget in milliseconds.
    pub max_duration_ms: Option<u64>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            max_qubits: DEFAULT_MAX_QUBITS,
            max_shots: DEFAULT_MAX_SHOTS,
            norm_policy: NormPolicy::default(),
            bit_order: BitOrder::default(),
            parallel_sampling: false,
            seed: None,
            max_duration_ms: None,
        }
    }
}

impl SimulatorConfig {
    fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            max_qubits: self.max_qubits,
            norm_policy: self.norm_policy,
            max_duration: self.max_duration_ms.map(Duration::from_millis),
        }
    }
}

/// Engine and sampler, cloned into each blocking task.
#[derive(Debug, Clone)]
struct Pipeline {
    name: String,
    engine: Engine,
    sampler: Sampler,
    default_seed: Option<u64>,
}

impl Pipeline {
    /// Evolve, sample and package one run. Never returns `Err`: execution
    /// failures become unsuccessful results.
    fn simulate(&self, circuit: &Circuit, options: &ExecutionOptions) -> ExecutionResult {
        let start = Instant::now();
        let mut execution = Execution::new(circuit.id(), options.shots);
        let outcome = execution
            .advance(ExecutionState::Ready)
            .and_then(|()| execution.advance(ExecutionState::Executing))
            .and_then(|()| self.engine.execute(circuit));

        let result = match outcome {
            Ok(evolution) => {
                let seed = options.seed.or(self.default_seed);
                let counts = self.sampler.sample(&evolution.state, options.shots, seed);
                if let Err(e) = execution.advance(ExecutionState::Completed) {
                    error!(circuit_id = circuit.id(), error = %e, "lifecycle error");
                }
                ExecutionResult::success(circuit.id(), &self.name, counts, options.shots)
                    .with_fidelity(evolution.fidelity())
            }
            Err(e) => {
                error!(circuit_id = circuit.id(), error = %e, "simulation failed");
                execution.fail(e.to_string());
                ExecutionResult::failure(circuit.id(), &self.name, options.shots, e.to_string())
            }
        };

        let elapsed = start.elapsed();
        debug!(
            circuit_id = circuit.id(),
            state = %execution.state,
            elapsed_ms = elapsed.as_millis() as u64,
            "run finished"
        );
        result.with_processing_time(elapsed.as_millis() as u64)
    }
}

/// Local state-vector simulator backend.
///
/// Keeps a registry of submitted circuits so callers can execute by id.
pub struct SimulatorBackend {
    config: SimulatorConfig,
    capabilities: Capabilities,
    pipeline: Pipeline,
    /// Registered circuits.
    circuits: Arc<Mutex<FxHashMap<String, Arc<Circuit>>>>,
}

impl SimulatorBackend {
    /// Create a new simulator backend with default settings.
    pub fn new() -> Self {
        Self::with_config(SimulatorConfig::default())
    }

    /// Create a simulator with custom max qubits.
    pub fn with_max_qubits(max_qubits: u32) -> Self {
        Self::with_config(SimulatorConfig {
            max_qubits,
            ..SimulatorConfig::default()
        })
    }

    /// Create a simulator from typed settings.
    ///
    /// A `max_qubits` above [`MAX_SUPPORTED_QUBITS`] is capped there.
    pub fn with_config(config: SimulatorConfig) -> Self {
        Self::named("simulator", config)
    }

    fn named(name: impl Into<String>, config: SimulatorConfig) -> Self {
        let name = name.into();
        let engine = Engine::new(config.engine_config());
        let mut capabilities = Capabilities::simulator(engine.max_qubits(), config.max_shots);
        capabilities.name.clone_from(&name);
        if config.parallel_sampling {
            capabilities.features.push("parallel_sampling".into());
        }
        let pipeline = Pipeline {
            name,
            engine,
            sampler: Sampler::new(config.bit_order).with_parallel(config.parallel_sampling),
            default_seed: config.seed,
        };
        Self {
            config,
            capabilities,
            pipeline,
            circuits: Arc::new(Mutex::new(FxHashMap::default())),
        }
    }

    /// The active settings.
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Store a circuit for later execution by id. Returns the id.
    pub fn register(&self, circuit: Circuit) -> String {
        let id = circuit.id().to_string();
        let mut circuits = self.circuits.lock().unwrap_or_else(PoisonError::into_inner);
        circuits.insert(id.clone(), Arc::new(circuit));
        debug!(circuit_id = %id, "registered circuit");
        id
    }

    /// Remove a registered circuit.
    pub fn unregister(&self, circuit_id: &str) -> Option<Arc<Circuit>> {
        self.circuits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(circuit_id)
    }

    /// Look up a registered circuit.
    pub fn registered(&self, circuit_id: &str) -> HalResult<Arc<Circuit>> {
        self.circuits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(circuit_id)
            .cloned()
            .ok_or_else(|| HalError::CircuitNotFound(circuit_id.to_string()))
    }

    /// Ids of all registered circuits, sorted.
    pub fn circuit_ids(&self) -> Vec<String> {
        let mut ids: Vec<_> = self
            .circuits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        ids.sort();
        ids
    }

    /// Run synchronously on the calling thread.
    #[instrument(skip(self, circuit, options), fields(circuit_id = circuit.id(), shots = options.shots))]
    pub fn execute(
        &self,
        circuit: &Circuit,
        options: &ExecutionOptions,
    ) -> HalResult<ExecutionResult> {
        self.validate(circuit, options)?;
        Ok(self.pipeline.simulate(circuit, options))
    }

    /// Run a registered circuit.
    pub async fn run_registered(
        &self,
        circuit_id: &str,
        options: &ExecutionOptions,
    ) -> HalResult<ExecutionResult> {
        let circuit = self.registered(circuit_id)?;
        self.run_shared(circuit, options).await
    }

    /// Serve a wire-form execution request.
    pub async fn handle_request(&self, request: ExecutionRequest) -> HalResult<ExecutionResult> {
        let options = request.options();
        match request.source {
            CircuitSource::Inline { circuit } => {
                let circuit = Circuit::from_spec(circuit)?;
                self.run_shared(Arc::new(circuit), &options).await
            }
            CircuitSource::Registered { circuit_id } => {
                self.run_registered(&circuit_id, &options).await
            }
        }
    }

    async fn run_shared(
        &self,
        circuit: Arc<Circuit>,
        options: &ExecutionOptions,
    ) -> HalResult<ExecutionResult> {
        self.validate(&circuit, options)?;
        info!(
            circuit_id = circuit.id(),
            num_qubits = circuit.num_qubits(),
            gates = circuit.depth(),
            shots = options.shots,
            "starting simulation"
        );

        let pipeline = self.pipeline.clone();
        let options = options.clone();
        tokio::task::spawn_blocking(move || pipeline.simulate(&circuit, &options))
            .await
            .map_err(|e| HalError::Backend(format!("simulation task failed: {e}")))
    }
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for SimulatorBackend {
    fn name(&self) -> &str {
        &self.pipeline.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    fn validate(&self, circuit: &Circuit, options: &ExecutionOptions) -> HalResult<()> {
        options.validate(self.config.max_shots)?;
        self.pipeline.engine.check_resources(circuit)
    }

    #[instrument(skip(self, circuit, options), fields(circuit_id = circuit.id()))]
    async fn run(
        &self,
        circuit: &Circuit,
        options: &ExecutionOptions,
    ) -> HalResult<ExecutionResult> {
        self.run_shared(Arc::new(circuit.clone()), options).await
    }
}

impl BackendFactory for SimulatorBackend {
    fn from_config(config: BackendConfig) -> HalResult<Self> {
        let settings: SimulatorConfig = config.extra_as()?;
        if settings.max_qubits == 0 || settings.max_qubits > MAX_SUPPORTED_QUBITS {
            return Err(HalError::Configuration(format!(
                "max_qubits must be in 1..={MAX_SUPPORTED_QUBITS}, got {}",
                settings.max_qubits
            )));
        }
        Ok(Self::named(config.name, settings))
    }
}
