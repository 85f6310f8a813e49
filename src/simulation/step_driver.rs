//! Runs the step loop on a fixed pool of worker threads.
//!
//! Every step goes through `BuildingTree → ComputingForces → Integrating` and the
//! pool crosses two barriers per step:
//!
//! 1. Each worker publishes a snapshot of the bodies it owns and waits at the
//!    *step* barrier. The last worker to arrive builds the step's force field from
//!    all snapshots, in body order, before anyone is released. Reads of the field
//!    therefore happen-after the build, and the build happens-after the previous
//!    step's integration.
//! 2. After accumulating forces on its own bodies each worker waits at the
//!    *force* barrier, so no body moves until every force of the step is known.
//!
//! Bodies are split once into contiguous ranges; a worker only ever writes its own
//! range, so body state needs no locking.
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::thread;
use std::time::{Duration, Instant};
use log::{debug, error, info, trace, warn};
use crate::particles::{Body, ForceField, ForceSolver, ParticleData};
use crate::simulation::{HaltOnPanic, PhaseBarrier, SimulationState, StaticPartition};
use crate::utils::{
    validate_theta, validate_time_step, ForceMethod, ForceParams, SimulationConfig, SimulationError, MAX_STEPS,
    MAX_WORKERS,
};

/// Where the step pipeline currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepPhase {
    BuildingTree,
    ComputingForces,
    Integrating,
    Done,
}

impl StepPhase {
    /// Whether the pipeline may move from `self` to `next`.
    pub fn can_advance_to(self, next: StepPhase) -> bool {
        matches!(
            (self, next),
            (StepPhase::BuildingTree, StepPhase::BuildingTree)
                | (StepPhase::BuildingTree, StepPhase::ComputingForces)
                | (StepPhase::BuildingTree, StepPhase::Done)
                | (StepPhase::ComputingForces, StepPhase::Integrating)
                | (StepPhase::Integrating, StepPhase::BuildingTree)
                | (StepPhase::Integrating, StepPhase::Done)
        )
    }
}

/// Requests a graceful stop; workers observe it at their next top-of-step barrier.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Outcome of one call to [`ParallelStepDriver::run`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub steps_completed: u64,
    pub elapsed: Duration,
    /// The run ended on a stop request before all steps were taken.
    pub halted_early: bool,
}

/// Drives a fixed number of steps over a [`SimulationState`].
///
/// # Examples
///
/// ```
/// use rs_barnes_hut::simulation::{new_simulation, ParallelStepDriver};
/// use rs_barnes_hut::utils::ForceMethod;
///
/// let mut state = new_simulation(32, 59.742, 0.05, 1).unwrap();
/// let driver = ParallelStepDriver::new(2, 0.5, 0.1, ForceMethod::BarnesHut).unwrap();
///
/// let summary = driver.run(&mut state, 10).unwrap();
/// assert_eq!(summary.steps_completed, 10);
/// assert_eq!(state.steps_completed, 10);
/// ```
#[derive(Debug)]
pub struct ParallelStepDriver {
    workers: usize,
    theta: f64,
    dt: f64,
    method: ForceMethod,
    stop: StopHandle,
}

impl ParallelStepDriver {
    /// # Errors
    ///
    /// Zero workers, a non-positive θ, or a non-positive Δt.
    pub fn new(workers: usize, theta: f64, dt: f64, method: ForceMethod) -> Result<Self, SimulationError> {
        if workers == 0 {
            return Err(SimulationError::InvalidWorkerCount);
        }
        validate_theta(theta)?;
        validate_time_step(dt)?;
        if workers > MAX_WORKERS {
            warn!("Worker count {} exceeds {}, clamping", workers, MAX_WORKERS);
        }
        Ok(Self {
            workers: workers.min(MAX_WORKERS),
            theta,
            dt,
            method,
            stop: StopHandle::default(),
        })
    }

    pub fn from_config(config: &SimulationConfig) -> Result<Self, SimulationError> {
        let config = config.validated()?;
        Self::new(config.worker_count, config.theta, config.dt, config.method)
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Advances `state` by up to `steps` steps.
    ///
    /// Returns early, with `halted_early` set, if a stop was requested. On error the
    /// bodies hold whatever the completed steps produced and no worker is left running.
    ///
    /// # Errors
    ///
    /// [`SimulationError::DegenerateConfiguration`] or [`SimulationError::BodyOutOfBounds`]
    /// if a step's tree cannot be built, [`SimulationError::WorkerPanicked`] if a worker
    /// panicked, [`SimulationError::WorkerSpawn`] if the pool could not be started.
    pub fn run(&self, state: &mut SimulationState, steps: u64) -> Result<RunSummary, SimulationError> {
        if steps > MAX_STEPS {
            warn!("Step count {} exceeds {}, clamping", steps, MAX_STEPS);
        }
        let steps = steps.min(MAX_STEPS);
        let solver = ForceSolver::new(ForceParams {
            gravity: state.gravity,
            theta: self.theta,
            softening: state.softening,
        })?;
        let partition = StaticPartition::contiguous(state.bodies.len(), self.workers);
        info!(
            "Running {} steps over {} bodies on {} workers (theta {}, dt {}, {:?})",
            steps,
            state.bodies.len(),
            self.workers,
            self.theta,
            self.dt,
            self.method
        );
        debug!("Body partition: {:?}", partition.ranges());

        let pipeline = StepPipeline {
            barrier: PhaseBarrier::new(self.workers),
            field: RwLock::new(None),
            mailboxes: (0..self.workers).map(|_| Mutex::new(Vec::new())).collect(),
            phase: Mutex::new(StepPhase::BuildingTree),
            step: AtomicU64::new(0),
            total_steps: steps,
            failure: Mutex::new(None),
            solver,
            method: self.method,
            dt: self.dt,
            stop: &self.stop,
        };

        let started = Instant::now();
        let chunks = partition.split_mut(&mut state.bodies);
        let panicked = thread::scope(|scope| {
            let mut handles = Vec::with_capacity(self.workers);
            for (worker, (chunk, range)) in chunks.into_iter().zip(partition.ranges()).enumerate() {
                let pipeline = &pipeline;
                let offset = range.start;
                let spawned = thread::Builder::new()
                    .name(format!("bh-worker-{}", worker))
                    .spawn_scoped(scope, move || pipeline.worker_loop(worker, offset, chunk));
                match spawned {
                    Ok(handle) => handles.push((worker, handle)),
                    Err(e) => {
                        pipeline.fail(SimulationError::WorkerSpawn(e.to_string()));
                        pipeline.barrier.halt();
                        break;
                    }
                }
            }
            handles
                .into_iter()
                .filter_map(|(worker, handle)| handle.join().err().map(|_| worker))
                .min()
        });
        let elapsed = started.elapsed();

        let steps_completed = pipeline.step.load(Ordering::SeqCst);
        state.steps_completed += steps_completed;

        if let Some(worker) = panicked {
            error!("Worker {} panicked; run halted after {} steps", worker, steps_completed);
            return Err(SimulationError::WorkerPanicked { worker });
        }
        let failure = pipeline.failure.into_inner().unwrap_or_else(PoisonError::into_inner);
        if let Some(e) = failure {
            error!("Run halted after {} steps: {}", steps_completed, e);
            return Err(e);
        }

        let halted_early = steps_completed < steps;
        info!(
            "Completed {} of {} steps in {:.3} ms{}",
            steps_completed,
            steps,
            elapsed.as_secs_f64() * 1e3,
            if halted_early { " (stopped)" } else { "" }
        );
        Ok(RunSummary { steps_completed, elapsed, halted_early })
    }
}

/// State shared by the workers of one run.
struct StepPipeline<'a> {
    barrier: PhaseBarrier,
    field: RwLock<Option<ForceField>>,
    /// One snapshot buffer per worker, written only by that worker.
    mailboxes: Vec<Mutex<Vec<ParticleData>>>,
    phase: Mutex<StepPhase>,
    /// Steps started so far; written only by the step barrier's release action.
    step: AtomicU64,
    total_steps: u64,
    failure: Mutex<Option<SimulationError>>,
    solver: ForceSolver,
    method: ForceMethod,
    dt: f64,
    stop: &'a StopHandle,
}

impl StepPipeline<'_> {
    fn worker_loop(&self, worker: usize, offset: usize, bodies: &mut [Body]) {
        let _guard = HaltOnPanic(&self.barrier);
        loop {
            self.publish(worker, offset, bodies);
            if self.barrier.wait_with(|| self.begin_step()).is_halted() {
                break;
            }

            {
                let field = self.field.read().unwrap_or_else(PoisonError::into_inner);
                if let Some(field) = field.as_ref() {
                    for (i, body) in bodies.iter_mut().enumerate() {
                        self.solver.apply_field(field, offset + i, body);
                    }
                }
            }

            let outcome = self.barrier.wait_with(|| {
                self.set_phase(StepPhase::Integrating);
                true
            });
            if outcome.is_halted() {
                break;
            }

            for body in bodies.iter_mut() {
                body.integrate(self.dt);
            }
        }
        trace!("Worker {} exiting", worker);
    }

    fn publish(&self, worker: usize, offset: usize, bodies: &[Body]) {
        let mut mailbox = self.mailboxes[worker].lock().unwrap_or_else(PoisonError::into_inner);
        mailbox.clear();
        mailbox.extend(bodies.iter().enumerate().map(|(i, b)| b.snapshot(offset + i)));
    }

    /// Release action of the step barrier: decides whether another step runs and,
    /// if so, builds its force field.
    fn begin_step(&self) -> bool {
        let step = self.step.load(Ordering::SeqCst);
        if step >= self.total_steps || self.stop.is_stopped() {
            self.set_phase(StepPhase::Done);
            return false;
        }

        self.set_phase(StepPhase::BuildingTree);
        let particles: Vec<ParticleData> = self
            .mailboxes
            .iter()
            .flat_map(|m| m.lock().unwrap_or_else(PoisonError::into_inner).clone())
            .collect();

        match ForceField::build(self.method, particles) {
            Ok(field) => {
                *self.field.write().unwrap_or_else(PoisonError::into_inner) = Some(field);
                self.step.store(step + 1, Ordering::SeqCst);
                self.set_phase(StepPhase::ComputingForces);
                trace!("Step {} started", step + 1);
                true
            }
            Err(e) => {
                self.fail(e);
                self.set_phase(StepPhase::Done);
                false
            }
        }
    }

    fn set_phase(&self, phase: StepPhase) {
        let mut current = self.phase.lock().unwrap_or_else(PoisonError::into_inner);
        debug_assert!(current.can_advance_to(phase), "illegal transition {:?} -> {:?}", *current, phase);
        trace!("Phase {:?} -> {:?}", *current, phase);
        *current = phase;
    }

    fn fail(&self, e: SimulationError) {
        let mut failure = self.failure.lock().unwrap_or_else(PoisonError::into_inner);
        failure.get_or_insert(e);
    }
}

/// Runs `steps` steps of `state` on `workers` threads and returns the advanced state.
///
/// `run(state, 0, ..)` returns the state unchanged.
pub fn run(mut state: SimulationState, steps: u64, workers: usize, theta: f64, dt: f64) -> Result<SimulationState, SimulationError> {
    let driver = ParallelStepDriver::new(workers, theta, dt, ForceMethod::BarnesHut)?;
    driver.run(&mut state, steps)?;
    Ok(state)
}

/// Seeds the scenario described by `config` and runs it to completion.
pub fn run_with_config(config: &SimulationConfig) -> Result<SimulationState, SimulationError> {
    let config = config.validated()?;
    let mut state = SimulationState::from_config(&config)?;
    ParallelStepDriver::from_config(&config)?.run(&mut state, config.step_count)?;
    Ok(state)
}
