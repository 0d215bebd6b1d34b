use models::fish::CreateFish;
use services::services::{
    forms::FormError,
    resources::{Fishes, ResourceService},
};

use super::Context;
use crate::{
    cli::{FishArgs, FishCommands},
    output::{print_table, text},
};

pub async fn handle(ctx: &Context, command: FishCommands) -> anyhow::Result<()> {
    let client = ctx.session()?;
    let fish = match command {
        FishCommands::List => ResourceService::list::<Fishes>(&client).await?,
        FishCommands::Create(fields) => {
            let payload = apply(
                CreateFish {
                    name: String::new(),
                    scientific_name: String::new(),
                },
                fields,
            )?;
            ResourceService::create::<Fishes>(&client, &payload).await?
        }
        FishCommands::Update { id, fields } => {
            let existing = ResourceService::find::<Fishes>(&client, &id).await?;
            let payload = apply(
                CreateFish {
                    name: existing.name,
                    scientific_name: existing.scientific_name.unwrap_or_default(),
                },
                fields,
            )?;
            ResourceService::update::<Fishes>(&client, &id, &payload).await?
        }
    };

    print_table(
        ctx.json,
        &fish,
        &["ID", "NAME", "SCIENTIFIC NAME"],
        |f| {
            vec![
                f.id.clone(),
                f.name.clone(),
                text(f.scientific_name.as_deref()),
            ]
        },
    )
}

fn apply(mut fish: CreateFish, fields: FishArgs) -> Result<CreateFish, FormError> {
    if let Some(name) = fields.name {
        fish.name = name.trim().to_string();
    }
    if let Some(scientific_name) = fields.scientific_name {
        fish.scientific_name = scientific_name.trim().to_string();
    }
    if fish.name.is_empty() {
        return Err(FormError::MissingField("name"));
    }
    Ok(fish)
}
