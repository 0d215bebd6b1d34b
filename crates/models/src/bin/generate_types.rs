use std::{env, fs, path::PathBuf};

use models::{
    access::{AssignRoles, CreateRole, Permission, Role, RolePermissionsChange},
    auth::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse},
    culture_cycle::{CreateCultureCycle, CultureCycle, CultureType},
    farm::{CreateFarm, Farm},
    feed::{CreateFeedStock, Feed, FeedStock, FeedUnit},
    fish::{CreateFish, Fish},
    pond::{CreatePond, Pond, PondClassification, PondType},
    pond_geometry::{
        Coercion, DimensionField, DimensionPolicy, PondMeta, PondShape, PondShapeInput,
        PondSizeResult, RawDimensions, SignRule, StoredPondMeta,
    },
    record_ref::RecordRef,
    user::User,
};
use ts_rs::TS;

fn main() -> std::io::Result<()> {
    let out = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("shared/types.ts"));

    let decls = [
        RecordRef::<Farm>::decl(),
        PondShape::decl(),
        DimensionField::decl(),
        Coercion::decl(),
        SignRule::decl(),
        DimensionPolicy::decl(),
        RawDimensions::decl(),
        PondShapeInput::decl(),
        PondMeta::decl(),
        PondSizeResult::decl(),
        StoredPondMeta::decl(),
        Farm::decl(),
        CreateFarm::decl(),
        PondType::decl(),
        PondClassification::decl(),
        Pond::decl(),
        CreatePond::decl(),
        Fish::decl(),
        CreateFish::decl(),
        CultureType::decl(),
        CultureCycle::decl(),
        CreateCultureCycle::decl(),
        Feed::decl(),
        FeedUnit::decl(),
        FeedStock::decl(),
        CreateFeedStock::decl(),
        Permission::decl(),
        Role::decl(),
        CreateRole::decl(),
        RolePermissionsChange::decl(),
        AssignRoles::decl(),
        User::decl(),
        LoginRequest::decl(),
        LoginResponse::decl(),
        RegisterRequest::decl(),
        RegisterResponse::decl(),
    ];

    let mut body = String::from("// This file was generated by `generate-types`. Do not edit.\n\n");
    for decl in decls {
        body.push_str("export ");
        body.push_str(&decl);
        body.push_str("\n\n");
    }

    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(&out, body)?;
    println!("wrote {}", out.display());
    Ok(())
}
