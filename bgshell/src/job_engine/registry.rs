// SPDX-License-Identifier: MIT

use log::debug;
use nix::unistd::Pid;

use crate::job_engine::job::{Job, JobState};

/// Ordered collection of tracked background jobs.
///
/// Insertion order is background-launch order. Records are only reachable
/// through identifier lookups or the `for_each` visitor.
#[derive(Debug, Default)]
pub struct JobRegistry {
    jobs: Vec<Job>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record. Returns false if the identifier is already tracked,
    /// the registry never holds two records with the same identifier.
    pub fn insert_at_end(&mut self, job: Job) -> bool {
        if self.contains(job.identifier()) {
            debug!("refusing duplicate registration of pid {}", job.identifier());
            return false;
        }
        self.jobs.push(job);
        true
    }

    /// Remove the record with the given identifier. Returns false if there
    /// was none, which means the job is already gone.
    pub fn remove_by_identifier(&mut self, identifier: Pid) -> bool {
        match self.jobs.iter().position(|j| j.identifier() == identifier) {
            Some(index) => {
                self.jobs.remove(index);
                true
            }
            None => false,
        }
    }

    /// Ordered traversal. The visitor gets the record and its 1-based index.
    pub fn for_each<F>(&self, mut visitor: F)
    where
        F: FnMut(usize, &Job),
    {
        for (index, job) in self.jobs.iter().enumerate() {
            visitor(index + 1, job);
        }
    }

    pub fn set_state(&mut self, identifier: Pid, state: JobState) -> bool {
        match self.jobs.iter_mut().find(|j| j.identifier() == identifier) {
            Some(job) => {
                job.set_state(state);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, identifier: Pid) -> bool {
        self.jobs.iter().any(|j| j.identifier() == identifier)
    }

    pub fn label_of(&self, identifier: Pid) -> Option<&str> {
        self.jobs
            .iter()
            .find(|j| j.identifier() == identifier)
            .map(|j| j.label())
    }

    /// Snapshot of the tracked identifiers in insertion order.
    pub fn identifiers(&self) -> Vec<Pid> {
        self.jobs.iter().map(|j| j.identifier()).collect()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
