use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use models::{
    culture_cycle::CultureType,
    feed::FeedUnit,
    pond::{PondClassification, PondType},
};

#[derive(Parser, Debug)]
#[command(name = "aquaconsole", version, about = "Aquaculture operations console")]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(long, global = true, env = "AQUA_BASE_URL", help = "Backend base URL")]
    pub base_url: Option<String>,
    #[arg(
        long,
        global = true,
        env = "AQUA_CONFIG_DIR",
        help = "Directory holding config.toml and the session token"
    )]
    pub config_dir: Option<PathBuf>,
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and store the session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "AQUA_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "AQUA_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    Logout,
    /// Show connection settings and whether a session is stored
    #[command(alias = "whoami")]
    Status,
    Dashboard,
    Farm {
        #[command(subcommand)]
        command: FarmCommands,
    },
    Pond {
        #[command(subcommand)]
        command: PondCommands,
    },
    Fish {
        #[command(subcommand)]
        command: FishCommands,
    },
    /// Culture cycles
    Cycle {
        #[command(subcommand)]
        command: CycleCommands,
    },
    Feed {
        #[command(subcommand)]
        command: FeedCommands,
    },
    FeedStock {
        #[command(subcommand)]
        command: FeedStockCommands,
    },
    Role {
        #[command(subcommand)]
        command: RoleCommands,
    },
    Permission {
        #[command(subcommand)]
        command: PermissionCommands,
    },
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
}

#[derive(Args, Debug, Default)]
pub struct FarmArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub area_size: Option<f64>,
    #[arg(long)]
    pub number_of_pond: Option<i64>,
    #[arg(long)]
    pub production_capacity: Option<f64>,
}

#[derive(Subcommand, Debug)]
pub enum FarmCommands {
    List,
    Create(FarmArgs),
    Update {
        id: String,
        #[command(flatten)]
        fields: FarmArgs,
    },
}

/// Shape and dimension inputs, passed to the calculator as typed.
#[derive(Args, Debug, Default)]
pub struct ShapeArgs {
    /// rectangle or rounded
    #[arg(long)]
    pub shape: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub length: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub width: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub depth: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub circumference: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct PondArgs {
    #[arg(long)]
    pub name: Option<String>,
    /// Farm id
    #[arg(long = "farm")]
    pub farm_id: Option<String>,
    #[arg(long = "type")]
    pub pond_type: Option<PondType>,
    /// ordinary, contraction or rnd
    #[arg(long = "classification")]
    pub pond_classification: Option<PondClassification>,
    #[arg(long = "image")]
    pub pond_image: Option<String>,
    #[command(flatten)]
    pub shape: ShapeArgs,
    /// Override the computed size
    #[arg(long, allow_hyphen_values = true)]
    pub size: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum PondCommands {
    List,
    Create(PondArgs),
    Update {
        id: String,
        #[command(flatten)]
        fields: PondArgs,
    },
    /// Compute a pond size locally without contacting the backend
    Size {
        #[command(flatten)]
        shape: ShapeArgs,
        /// Reject blank, malformed and negative dimensions
        #[arg(long)]
        strict: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct FishArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub scientific_name: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum FishCommands {
    List,
    Create(FishArgs),
    Update {
        id: String,
        #[command(flatten)]
        fields: FishArgs,
    },
}

#[derive(Args, Debug, Default)]
pub struct CycleArgs {
    #[arg(long)]
    pub name: Option<String>,
    /// mono or poly
    #[arg(long)]
    pub culture_type: Option<CultureType>,
    /// YYYY-MM-DD
    #[arg(long)]
    pub start_date: Option<String>,
    /// Pond id, repeatable
    #[arg(long = "pond")]
    pub ponds: Vec<String>,
    /// Fish id, repeatable
    #[arg(long = "fish")]
    pub fish: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum CycleCommands {
    List,
    Create(CycleArgs),
    Update {
        id: String,
        #[command(flatten)]
        fields: CycleArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum FeedCommands {
    List,
}

#[derive(Args, Debug, Default)]
pub struct FeedStockArgs {
    /// Feed id
    #[arg(long = "feed")]
    pub feed_id: Option<String>,
    #[arg(long)]
    pub amount: Option<f64>,
    /// KG, GM or Pieces
    #[arg(long)]
    pub unit: Option<FeedUnit>,
    #[arg(long)]
    pub price: Option<f64>,
    #[arg(long)]
    pub remarks: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum FeedStockCommands {
    List,
    Create(FeedStockArgs),
    Update {
        id: String,
        #[command(flatten)]
        fields: FeedStockArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum RoleCommands {
    List,
    Show {
        id: String,
    },
    Create {
        #[arg(long)]
        name: String,
        /// Permission id or name, repeatable
        #[arg(long = "permission")]
        permissions: Vec<String>,
    },
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        /// Permission id or name to switch on or off, repeatable
        #[arg(long = "toggle")]
        toggles: Vec<String>,
    },
    Delete {
        id: String,
        #[arg(long, short)]
        yes: bool,
    },
    /// Assign the permission if the role lacks it, revoke it otherwise
    TogglePermission {
        role: String,
        permission: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum PermissionCommands {
    List,
}

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    List,
    AssignRoles {
        user: String,
        /// Role id or name, repeatable
        #[arg(long = "role", required = true)]
        roles: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn negative_dimensions_are_values_not_flags() {
        let cli = Cli::try_parse_from([
            "aquaconsole",
            "pond",
            "size",
            "--shape",
            "rectangle",
            "--length",
            "-3",
        ])
        .unwrap();
        match cli.command {
            Commands::Pond {
                command: PondCommands::Size { shape, .. },
            } => assert_eq!(shape.length.as_deref(), Some("-3")),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn enums_parse_from_flags() {
        let cli = Cli::try_parse_from([
            "aquaconsole",
            "pond",
            "create",
            "--type",
            "nursery",
            "--classification",
            "rnd",
        ])
        .unwrap();
        match cli.command {
            Commands::Pond {
                command: PondCommands::Create(args),
            } => {
                assert_eq!(args.pond_type, Some(PondType::Nursery));
                assert_eq!(
                    args.pond_classification,
                    Some(PondClassification::ResearchAndDevelopment)
                );
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
