use models::{
    Record,
    feed::{CreateFeedStock, FeedUnit},
};
use services::services::{
    forms::FormError,
    resources::{FeedStocks, Feeds, ResourceService},
};

use super::Context;
use crate::{
    cli::{FeedCommands, FeedStockArgs, FeedStockCommands},
    output::{num, print_table, text},
};

pub async fn handle_feeds(ctx: &Context, command: FeedCommands) -> anyhow::Result<()> {
    let client = ctx.session()?;
    let feeds = match command {
        FeedCommands::List => ResourceService::list::<Feeds>(&client).await?,
    };
    print_table(ctx.json, &feeds, &["ID", "NAME"], |f| {
        vec![f.id.clone(), f.name.clone()]
    })
}

pub async fn handle_stocks(ctx: &Context, command: FeedStockCommands) -> anyhow::Result<()> {
    let client = ctx.session()?;
    let stocks = match command {
        FeedStockCommands::List => ResourceService::list::<FeedStocks>(&client).await?,
        FeedStockCommands::Create(fields) => {
            let payload = apply(
                CreateFeedStock {
                    feed_id: String::new(),
                    amount: 0.0,
                    unit: FeedUnit::default(),
                    price: 0.0,
                    remarks: String::new(),
                },
                fields,
            )?;
            ResourceService::create::<FeedStocks>(&client, &payload).await?
        }
        FeedStockCommands::Update { id, fields } => {
            let existing = ResourceService::find::<FeedStocks>(&client, &id).await?;
            let payload = apply(CreateFeedStock::from_existing(&existing), fields)?;
            ResourceService::update::<FeedStocks>(&client, &id, &payload).await?
        }
    };

    print_table(
        ctx.json,
        &stocks,
        &["ID", "FEED", "AMOUNT", "UNIT", "PRICE", "REMARKS"],
        |s| {
            vec![
                s.id.clone(),
                s.label().to_string(),
                num(s.amount),
                s.unit.to_string(),
                num(s.price),
                text(s.remarks.as_deref()),
            ]
        },
    )
}

fn apply(mut stock: CreateFeedStock, fields: FeedStockArgs) -> Result<CreateFeedStock, FormError> {
    if let Some(feed_id) = fields.feed_id {
        stock.feed_id = feed_id.trim().to_string();
    }
    if let Some(amount) = fields.amount {
        stock.amount = amount;
    }
    if let Some(unit) = fields.unit {
        stock.unit = unit;
    }
    if let Some(price) = fields.price {
        stock.price = price;
    }
    if let Some(remarks) = fields.remarks {
        stock.remarks = remarks;
    }
    if stock.feed_id.is_empty() {
        return Err(FormError::MissingField("feed_id"));
    }
    Ok(stock)
}
