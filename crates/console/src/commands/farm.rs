use models::farm::CreateFarm;
use services::services::{
    forms::FormError,
    resources::{Farms, ResourceService},
};

use super::Context;
use crate::{
    cli::{FarmArgs, FarmCommands},
    output::{num, print_table, text},
};

pub async fn handle(ctx: &Context, command: FarmCommands) -> anyhow::Result<()> {
    let client = ctx.session()?;
    let farms = match command {
        FarmCommands::List => ResourceService::list::<Farms>(&client).await?,
        FarmCommands::Create(fields) => {
            let payload = apply(
                CreateFarm {
                    name: String::new(),
                    location: String::new(),
                    area_size: 0.0,
                    number_of_pond: 0,
                    production_capacity: 0.0,
                },
                fields,
            )?;
            ResourceService::create::<Farms>(&client, &payload).await?
        }
        FarmCommands::Update { id, fields } => {
            let existing = ResourceService::find::<Farms>(&client, &id).await?;
            let payload = apply(CreateFarm::from_existing(&existing), fields)?;
            ResourceService::update::<Farms>(&client, &id, &payload).await?
        }
    };

    print_table(
        ctx.json,
        &farms,
        &["ID", "NAME", "LOCATION", "AREA", "PONDS", "CAPACITY"],
        |f| {
            vec![
                f.id.clone(),
                f.name.clone(),
                text(f.location.as_deref()),
                num(f.area_size),
                f.number_of_pond
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                num(f.production_capacity),
            ]
        },
    )
}

fn apply(mut farm: CreateFarm, fields: FarmArgs) -> Result<CreateFarm, FormError> {
    if let Some(name) = fields.name {
        farm.name = name.trim().to_string();
    }
    if let Some(location) = fields.location {
        farm.location = location;
    }
    if let Some(area_size) = fields.area_size {
        farm.area_size = area_size;
    }
    if let Some(number_of_pond) = fields.number_of_pond {
        farm.number_of_pond = number_of_pond;
    }
    if let Some(capacity) = fields.production_capacity {
        farm.production_capacity = capacity;
    }
    if farm.name.is_empty() {
        return Err(FormError::MissingField("name"));
    }
    Ok(farm)
}
