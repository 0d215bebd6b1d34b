use anyhow::bail;
use models::{
    Record,
    farm::Farm,
    pond::Pond,
    pond_geometry::{DimensionPolicy, PondMeta, RawDimensions, compute_size_with},
};
use services::services::{
    pond_form::{PondField, PondForm},
    resources::{Farms, Ponds, ResourceService},
};

use super::Context;
use crate::{
    cli::{PondArgs, PondCommands, ShapeArgs},
    output::{num, print_one, print_table, text},
};

pub async fn handle(ctx: &Context, command: PondCommands) -> anyhow::Result<()> {
    if let PondCommands::Size { shape, strict } = command {
        return size(ctx, shape, strict);
    }

    let client = ctx.session()?;
    let policy = ctx.config.dimensions;
    let ponds = match command {
        PondCommands::Create(fields) => {
            let mut form = PondForm::open_create().with_policy(policy);
            apply(&mut form, fields)?;
            ResourceService::create::<Ponds>(&client, &form.submit()?).await?
        }
        PondCommands::Update { id, fields } => {
            let existing = ResourceService::find::<Ponds>(&client, &id).await?;
            let mut form = PondForm::open_edit(&existing).with_policy(policy);
            apply(&mut form, fields)?;
            ResourceService::update::<Ponds>(&client, &id, &form.submit()?).await?
        }
        PondCommands::List | PondCommands::Size { .. } => {
            ResourceService::list::<Ponds>(&client).await?
        }
    };
    let farms = ResourceService::list::<Farms>(&client).await?;

    print_table(
        ctx.json,
        &ponds,
        &["ID", "NAME", "FARM", "SIZE", "SHAPE", "TYPE", "CLASS"],
        |p| row(p, &farms),
    )
}

fn row(pond: &Pond, farms: &[Farm]) -> Vec<String> {
    let farm = pond
        .farm_id
        .as_ref()
        .map(|r| r.resolve(farms).map(Record::label).unwrap_or(r.label()))
        .map(str::to_string);
    vec![
        pond.id.clone(),
        pond.name.clone(),
        text(farm.as_deref()),
        num(pond.pond_size),
        text(pond.stored_meta().shape.as_deref()),
        text(pond.pond_type.map(|t| t.to_string()).as_deref()),
        text(pond.pond_classification.map(|c| c.to_string()).as_deref()),
    ]
}

/// Feed the flags through the form in the order a user fills it in, so the
/// size flag lands after the dimensions and overrides the computed value.
fn apply(form: &mut PondForm, fields: PondArgs) -> anyhow::Result<()> {
    let mut changes: Vec<(PondField, String)> = Vec::new();
    let mut push = |field, value: Option<String>| {
        if let Some(value) = value {
            changes.push((field, value));
        }
    };
    push(PondField::Name, fields.name);
    push(PondField::FarmId, fields.farm_id);
    push(PondField::PondType, fields.pond_type.map(|t| t.to_string()));
    push(
        PondField::PondClassification,
        fields.pond_classification.map(|c| c.to_string()),
    );
    push(PondField::PondImage, fields.pond_image);
    push(PondField::PondShape, fields.shape.shape);
    push(PondField::Length, fields.shape.length);
    push(PondField::Width, fields.shape.width);
    push(PondField::Depth, fields.shape.depth);
    push(PondField::Circumference, fields.shape.circumference);
    push(PondField::PondSize, fields.size);

    for (field, value) in changes {
        form.handle_change(field, &value)?;
    }
    Ok(())
}

fn size(ctx: &Context, shape: ShapeArgs, strict: bool) -> anyhow::Result<()> {
    let policy = if strict {
        DimensionPolicy::STRICT
    } else {
        ctx.config.dimensions
    };
    let selector = shape.shape.unwrap_or_default();
    let dimensions = RawDimensions {
        length: shape.length.unwrap_or_default(),
        width: shape.width.unwrap_or_default(),
        depth: shape.depth.unwrap_or_default(),
        circumference: shape.circumference.unwrap_or_default(),
    };

    let Some(result) = compute_size_with(policy, &selector, &dimensions)? else {
        bail!("unknown pond shape {selector:?}, expected rectangle or rounded");
    };
    print_one(ctx.json, result, |r| {
        format!("size: {}\n{}", num(Some(r.size)), describe(&r.meta))
    })
}

fn describe(meta: &PondMeta) -> String {
    match *meta {
        PondMeta::Rectangle {
            length,
            width,
            depth,
        } => format!("shape: rectangle  length: {length}  width: {width}  depth: {depth}"),
        PondMeta::Rounded {
            circumference,
            depth,
        } => format!("shape: rounded  circumference: {circumference}  depth: {depth}"),
    }
}
