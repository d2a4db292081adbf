use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::{
    client::{
        api::PortfolioClient,
        merge::{merge_skills, DisplaySkill},
        timer::Delay,
        ClientError,
    },
    entities::{project::Project, skill::Skill},
};

#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioData {
    pub projects: Vec<Project>,
    pub skills: Vec<DisplaySkill>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Loading,
    Loaded(PortfolioData),
    /// Retries exhausted. Loading is over and nothing was loaded.
    FailedAfterRetries,
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }
}

/// Receives every state the loader commits.
pub trait LoaderView: Send + Sync {
    fn render(&self, state: &LoadState);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_retries: 3,
            delay: Duration::from_secs(1),
        }
    }
}

/// Cleared on unmount. Checked before every state commit.
#[derive(Debug, Clone)]
pub struct Liveness(Arc<AtomicBool>);

impl Liveness {
    pub fn new() -> Self {
        Liveness(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn unmount(&self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

pub struct DataLoader<C, V, D>
where
    C: PortfolioClient,
    V: LoaderView,
    D: Delay,
{
    client: Arc<C>,
    view: Arc<V>,
    delay: Arc<D>,
    policy: RetryPolicy,
}

impl<C, V, D> DataLoader<C, V, D>
where
    C: PortfolioClient + 'static,
    V: LoaderView + 'static,
    D: Delay,
{
    pub fn new(client: Arc<C>, view: Arc<V>, delay: Arc<D>) -> Self {
        DataLoader { client, view, delay, policy: RetryPolicy::default() }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Starts loading in the background. Dropping the returned handle does
    /// not cancel; call [`MountHandle::unmount`].
    pub fn mount(self: Arc<Self>) -> MountHandle {
        let liveness = Liveness::new();
        let task_liveness = liveness.clone();
        let task = tokio::spawn(async move {
            self.run(&task_liveness).await;
        });

        MountHandle { liveness, task }
    }

    /// Runs the load to completion and returns the last committed state, or
    /// `None` when unmounted first. Each round fetches projects and skills
    /// concurrently; a failed round is retried in full after a fixed delay.
    pub async fn run(&self, liveness: &Liveness) -> Option<LoadState> {
        self.commit(liveness, LoadState::Loading)?;

        let mut retries = 0;
        loop {
            match self.fetch_round().await {
                Ok((projects, skills)) => {
                    let skills = merge_skills(&skills, &projects);
                    return self.commit(liveness, LoadState::Loaded(PortfolioData { projects, skills }));
                }
                Err(e) if retries < self.policy.max_retries => {
                    retries += 1;
                    warn!(retry = retries, "Fetching portfolio data failed, retrying: {}", e);

                    self.delay.sleep(self.policy.delay).await;
                    if !liveness.is_alive() {
                        debug!("Loader unmounted while waiting to retry");
                        return None;
                    }
                }
                Err(e) => {
                    error!("Failed after retries: {}", e);
                    return self.commit(liveness, LoadState::FailedAfterRetries);
                }
            }
        }
    }

    async fn fetch_round(&self) -> Result<(Vec<Project>, Vec<Skill>), ClientError> {
        tokio::try_join!(self.client.fetch_projects(), self.client.fetch_skills())
    }

    fn commit(&self, liveness: &Liveness, state: LoadState) -> Option<LoadState> {
        if !liveness.is_alive() {
            debug!("Dropping state update after unmount");
            return None;
        }
        self.view.render(&state);
        Some(state)
    }
}

pub struct MountHandle {
    liveness: Liveness,
    task: JoinHandle<()>,
}

impl MountHandle {
    /// Suppresses every later state update. Requests already in flight are
    /// left to finish.
    pub fn unmount(&self) {
        self.liveness.unmount();
    }

    pub fn is_mounted(&self) -> bool {
        self.liveness.is_alive()
    }

    /// Waits for the background load to stop.
    pub async fn finished(self) {
        if let Err(e) = self.task.await {
            error!("Loader task failed: {}", e);
        }
    }
}
