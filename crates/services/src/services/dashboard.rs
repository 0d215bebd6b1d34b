use models::{Record, culture_cycle::CultureCycle, farm::Farm, fish::Fish, pond::Pond};
use serde::Serialize;
use tracing::debug;

use super::{
    api_client::{ApiClient, ApiError},
    resources::{CultureCycles, Farms, Fishes, Ponds, ResourceService},
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub farms: usize,
    pub ponds: usize,
    pub fish_species: usize,
    pub culture_cycles: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FarmPonds {
    pub farm: String,
    pub ponds: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleFish {
    pub culture_cycle: String,
    pub fish_species: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub totals: Totals,
    /// One entry per farm, in backend order
    pub ponds_per_farm: Vec<FarmPonds>,
    pub fish_per_cycle: Vec<CycleFish>,
}

impl DashboardStats {
    pub fn from_collections(
        farms: &[Farm],
        ponds: &[Pond],
        fish: &[Fish],
        cycles: &[CultureCycle],
    ) -> Self {
        let ponds_per_farm = farms
            .iter()
            .map(|farm| FarmPonds {
                farm: farm.name.clone(),
                ponds: ponds
                    .iter()
                    .filter(|p| p.farm_id() == Some(farm.id()))
                    .count(),
            })
            .collect();

        let fish_per_cycle = cycles
            .iter()
            .map(|cycle| CycleFish {
                culture_cycle: cycle.name.clone(),
                fish_species: cycle.fish.len(),
            })
            .collect();

        Self {
            totals: Totals {
                farms: farms.len(),
                ponds: ponds.len(),
                fish_species: fish.len(),
                culture_cycles: cycles.len(),
            },
            ponds_per_farm,
            fish_per_cycle,
        }
    }
}

pub struct DashboardService;

impl DashboardService {
    /// Fetch the four collections concurrently and summarise them.
    pub async fn fetch(client: &ApiClient) -> Result<DashboardStats, ApiError> {
        let (farms, ponds, fish, cycles) = tokio::try_join!(
            ResourceService::list::<Farms>(client),
            ResourceService::list::<Ponds>(client),
            ResourceService::list::<Fishes>(client),
            ResourceService::list::<CultureCycles>(client),
        )?;
        debug!(
            farms = farms.len(),
            ponds = ponds.len(),
            fish = fish.len(),
            cycles = cycles.len(),
            "Fetched dashboard collections"
        );
        Ok(DashboardStats::from_collections(
            &farms, &ponds, &fish, &cycles,
        ))
    }
}
