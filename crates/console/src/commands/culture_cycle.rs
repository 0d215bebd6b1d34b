use models::culture_cycle::{CultureCycle, CultureType};
use services::services::{
    culture_cycle_form::CultureCycleForm,
    resources::{CultureCycles, ResourceService},
};
use tracing::warn;

use super::Context;
use crate::{
    cli::{CycleArgs, CycleCommands},
    output::{print_table, text},
};

pub async fn handle(ctx: &Context, command: CycleCommands) -> anyhow::Result<()> {
    let client = ctx.session()?;
    let cycles = match command {
        CycleCommands::List => ResourceService::list::<CultureCycles>(&client).await?,
        CycleCommands::Create(fields) => {
            let mut form = CultureCycleForm::open_create();
            apply(&mut form, fields);
            ResourceService::create::<CultureCycles>(&client, &form.submit()?).await?
        }
        CycleCommands::Update { id, fields } => {
            let existing = ResourceService::find::<CultureCycles>(&client, &id).await?;
            let mut form = CultureCycleForm::open_edit(&existing);
            apply(&mut form, fields);
            ResourceService::update::<CultureCycles>(&client, &id, &form.submit()?).await?
        }
    };

    print_table(
        ctx.json,
        &cycles,
        &["ID", "NAME", "TYPE", "START", "PONDS", "FISH"],
        row,
    )
}

fn row(cycle: &CultureCycle) -> Vec<String> {
    let labels = |refs: Vec<&str>| {
        if refs.is_empty() {
            "-".to_string()
        } else {
            refs.join(", ")
        }
    };
    vec![
        cycle.id.clone(),
        cycle.name.clone(),
        text(cycle.culture_type.map(|t| t.to_string()).as_deref()),
        text(cycle.start_day().map(|d| d.to_string()).as_deref()),
        labels(cycle.ponds.iter().map(|p| p.label()).collect()),
        labels(cycle.fish.iter().map(|f| f.label()).collect()),
    ]
}

fn apply(form: &mut CultureCycleForm, fields: CycleArgs) {
    if let Some(name) = fields.name {
        form.name = name;
    }
    if let Some(culture_type) = fields.culture_type {
        form.set_culture_type(culture_type);
    }
    if let Some(start_date) = fields.start_date {
        form.start_date = start_date;
    }
    if !fields.ponds.is_empty() {
        form.select_ponds(fields.ponds);
    }
    if !fields.fish.is_empty() {
        let requested = fields.fish.len();
        form.select_fish(fields.fish);
        if form.culture_type() == CultureType::Mono && requested > form.fish().len() {
            warn!(kept = %form.fish()[0], "Monoculture keeps a single fish species");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switching_to_mono_without_fish_clears_selection() {
        let cycle: CultureCycle = serde_json::from_value(serde_json::json!({
            "_id": "c1",
            "name": "Winter",
            "culture_type": "poly",
            "start_date": "2024-11-03",
            "fish": ["f1", "f2"]
        }))
        .unwrap();
        let mut form = CultureCycleForm::open_edit(&cycle);
        apply(
            &mut form,
            CycleArgs {
                culture_type: Some(CultureType::Mono),
                ..Default::default()
            },
        );
        assert!(form.fish().is_empty());
        assert_eq!(form.submit().unwrap().start_date.to_string(), "2024-11-03");
    }

    #[test]
    fn row_lists_labels() {
        let cycle: CultureCycle = serde_json::from_value(serde_json::json!({
            "_id": "c1",
            "name": "Winter",
            "ponds": [{"_id": "p1", "name": "A"}, "p2"],
        }))
        .unwrap();
        let cells = row(&cycle);
        assert_eq!(cells[4], "A, p2");
        assert_eq!(cells[5], "-");
        assert_eq!(cells[3], "-");
    }
}
