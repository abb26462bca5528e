//! Step execution and per-step JSON reports.

use crate::config::{GridSection, Step};
use memory_grid::{MemoryGrid, MemoryMap};
use rx_grid::client::{FunctionRef, MapEntry, ProcessorRef};
use rx_grid::{Completable, GridError, Observable, RxAtomicLong, RxGrid, RxMap};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

const SCENARIO_RUNNER_TAG: &str = "ScenarioRunner:";
const SCENARIO_RUNNER_FN_RUN_TAG: &str = "run():";

type Counter = RxAtomicLong<memory_grid::MemoryAtomicLong>;
type StringMap = RxMap<MemoryMap<String, String>>;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Value(serde_json::Value),
    Completed(bool),
    Error { code: &'static str, message: String },
}

impl From<GridError> for Outcome {
    fn from(error: GridError) -> Self {
        Outcome::Error {
            code: error.code().as_str(),
            message: error.message().to_string(),
        }
    }
}

/// Result of one step, serialized as a single JSON line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    pub step: usize,
    pub op: &'static str,
    #[serde(flatten)]
    pub outcome: Outcome,
}

pub struct ScenarioRunner {
    grid: RxGrid<MemoryGrid>,
}

impl ScenarioRunner {
    pub fn start(section: &GridSection, latency_ms: Option<u64>) -> Result<Self, GridError> {
        let instance = MemoryGrid::start(section.to_grid_config(latency_ms))?;
        Ok(Self {
            grid: RxGrid::from_instance(Arc::new(instance)),
        })
    }

    pub fn grid(&self) -> &RxGrid<MemoryGrid> {
        &self.grid
    }

    /// Executes `steps` in order, handing each report to `report` as soon as
    /// the step terminates. Failed steps do not stop the run.
    pub async fn run<F>(&self, steps: &[Step], mut report: F)
    where
        F: FnMut(StepReport),
    {
        info!(
            "{SCENARIO_RUNNER_TAG}:{SCENARIO_RUNNER_FN_RUN_TAG} running {} steps",
            steps.len()
        );
        for (index, step) in steps.iter().enumerate() {
            let outcome = self.execute(step).await;
            debug!(
                "{SCENARIO_RUNNER_TAG}:{SCENARIO_RUNNER_FN_RUN_TAG} step {index} {} -> {outcome:?}",
                step.op()
            );
            report(StepReport {
                step: index,
                op: step.op(),
                outcome,
            });
        }
    }

    /// Collects every report.
    pub async fn run_all(&self, steps: &[Step]) -> Vec<StepReport> {
        let mut reports = Vec::with_capacity(steps.len());
        self.run(steps, |report| reports.push(report)).await;
        reports
    }

    fn counter(&self, name: &str) -> Counter {
        self.grid.get_atomic_long(name)
    }

    fn map(&self, name: &str) -> Result<StringMap, GridError> {
        self.grid.get_map::<String, String>(name)
    }

    async fn execute(&self, step: &Step) -> Outcome {
        match step {
            Step::Get { counter } => value_of(self.counter(counter).get()).await,
            Step::Set { counter, value } => completion_of(self.counter(counter).set(*value)).await,
            Step::IncrementAndGet { counter } => {
                value_of(self.counter(counter).increment_and_get()).await
            }
            Step::GetAndIncrement { counter } => {
                value_of(self.counter(counter).get_and_increment()).await
            }
            Step::DecrementAndGet { counter } => {
                value_of(self.counter(counter).decrement_and_get()).await
            }
            Step::AddAndGet { counter, delta } => {
                value_of(self.counter(counter).add_and_get(*delta)).await
            }
            Step::GetAndAdd { counter, delta } => {
                value_of(self.counter(counter).get_and_add(*delta)).await
            }
            Step::GetAndSet { counter, value } => {
                value_of(self.counter(counter).get_and_set(*value)).await
            }
            Step::CompareAndSet {
                counter,
                expect,
                update,
            } => value_of(self.counter(counter).compare_and_set(*expect, *update)).await,
            Step::AlterAdd { counter, delta } => {
                completion_of(self.counter(counter).alter(Some(adding(*delta)))).await
            }
            Step::AlterAndGetAdd { counter, delta } => {
                value_of(self.counter(counter).alter_and_get(Some(adding(*delta)))).await
            }
            Step::GetAndAlterAdd { counter, delta } => {
                value_of(self.counter(counter).get_and_alter(Some(adding(*delta)))).await
            }
            Step::ApplyMultiply { counter, factor } => {
                let factor = *factor;
                let multiply: FunctionRef<i64, i64> =
                    Arc::new(move |value: i64| value.wrapping_mul(factor));
                value_of(self.counter(counter).apply(Some(multiply))).await
            }
            Step::MapGet { map, key } => match self.map(map) {
                Ok(map) => value_of(map.get(key.clone())).await,
                Err(error) => error.into(),
            },
            Step::MapPut {
                map,
                key,
                value,
                ttl_ms,
            } => match self.map(map) {
                Ok(map) => {
                    let put = match ttl_ms {
                        Some(ttl_ms) => map.put_with_ttl(
                            key.clone(),
                            value.clone(),
                            Duration::from_millis(*ttl_ms),
                        ),
                        None => map.put(key.clone(), value.clone()),
                    };
                    value_of(put).await
                }
                Err(error) => error.into(),
            },
            Step::MapSet {
                map,
                key,
                value,
                ttl_ms,
            } => match self.map(map) {
                Ok(map) => {
                    let set = match ttl_ms {
                        Some(ttl_ms) => map.set_with_ttl(
                            key.clone(),
                            value.clone(),
                            Duration::from_millis(*ttl_ms),
                        ),
                        None => map.set(key.clone(), value.clone()),
                    };
                    completion_of(set).await
                }
                Err(error) => error.into(),
            },
            Step::MapRemove { map, key } => match self.map(map) {
                Ok(map) => value_of(map.remove(key.clone())).await,
                Err(error) => error.into(),
            },
            Step::MapAppend { map, key, suffix } => match self.map(map) {
                Ok(map) => value_of(map.submit_to_key(key.clone(), appending(suffix))).await,
                Err(error) => error.into(),
            },
            Step::Sleep { ms } => {
                tokio::time::sleep(Duration::from_millis(*ms)).await;
                Outcome::Completed(true)
            }
        }
    }
}

fn adding(delta: i64) -> FunctionRef<i64, i64> {
    Arc::new(move |value: i64| value.wrapping_add(delta))
}

fn appending(suffix: &str) -> ProcessorRef<String, String, String> {
    let suffix = suffix.to_string();
    Arc::new(move |entry: &mut MapEntry<String, String>| {
        let next = format!("{}{suffix}", entry.value().map(String::as_str).unwrap_or(""));
        entry.set_value(Some(next.clone()));
        next
    })
}

async fn value_of<T: Serialize + Send + 'static>(observable: Observable<T>) -> Outcome {
    match observable.first().await {
        Ok(Some(value)) => match serde_json::to_value(value) {
            Ok(value) => Outcome::Value(value),
            Err(error) => Outcome::Error {
                code: rx_grid::ErrorCode::Internal.as_str(),
                message: format!("Unable to serialize result: {error}"),
            },
        },
        Ok(None) => Outcome::Completed(true),
        Err(error) => error.into(),
    }
}

async fn completion_of(completable: Completable) -> Outcome {
    match completable.first().await {
        Ok(_) => Outcome::Completed(true),
        Err(error) => error.into(),
    }
}
