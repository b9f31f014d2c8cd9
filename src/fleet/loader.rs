//! Fleet loading
//!
//! Fans the instance poller out across every instance of a host
//! concurrently and collects the results into an ordered fleet. Loading is
//! all-or-nothing per host: one failing instance fails the whole fleet.

use std::time::Duration;

use async_trait::async_trait;
use futures::future::try_join_all;
use tracing::debug;

use crate::hosts::Host;
use crate::node::{Fleet, NodeApiClient};
use crate::profile::{AddressingProfile, FleetPlan};
use crate::types::Result;

/// Seam between the aggregation layer and the network.
///
/// Production uses [`HttpFleetLoader`]; tests inject stubs to exercise
/// aggregation behavior without sockets.
#[async_trait]
pub trait FleetLoader: Send + Sync {
    /// Load the full fleet for one host
    async fn load(&self, host: &Host) -> Result<Fleet>;
}

/// Fleet loader backed by the node REST API
#[derive(Debug, Clone)]
pub struct HttpFleetLoader {
    client: NodeApiClient,
}

impl HttpFleetLoader {
    pub fn new(request_timeout: Duration) -> Self {
        Self {
            client: NodeApiClient::new(request_timeout),
        }
    }

    /// Poll every instance of a resolved plan concurrently.
    ///
    /// All polls start without waiting on each other; the call resolves
    /// once every instance finished. `try_join_all` keeps input order, so
    /// the returned fleet is ordered by instance index with
    /// `instance_index == position`.
    pub async fn load_plan(&self, plan: &FleetPlan) -> Result<Fleet> {
        let polls = plan.instances.iter().enumerate().map(|(index, endpoints)| {
            self.client.poll(endpoints, &plan.access_token, index)
        });

        try_join_all(polls).await
    }
}

#[async_trait]
impl FleetLoader for HttpFleetLoader {
    async fn load(&self, host: &Host) -> Result<Fleet> {
        let profile = AddressingProfile::classify(&host.environment);
        let plan = profile.resolve(&host.url, &host.access_token);

        debug!(
            host = %host.identifier,
            profile = ?profile,
            instances = plan.instances.len(),
            "Loading fleet"
        );

        self.load_plan(&plan).await
    }
}
