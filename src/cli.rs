//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use solar_sizer::devices::{DeviceDraft, DevicePatch};
use solar_sizer::system::{SystemConfigPatch, SystemType};

#[derive(Debug, Parser)]
#[command(name = "solar-sizer")]
#[command(author, version, about = "Size a solar installation from a device inventory")]
#[command(
    long_about = "Keeps an inventory of household devices and sizes panels, inverter \
    and batteries for it.\n\
    \nState is saved after every change and reloaded on the next run.\n\
    \nExamples:\n  \
    solar-sizer add --name \"ثلاجة\" --wattage 150 --hours 24\n  \
    solar-sizer configure --type hybrid --sun-hours 6\n  \
    solar-sizer calculate --breakdown-out breakdown.csv"
)]
pub struct Cli {
    /// Load application configuration from a TOML file
    #[arg(long, global = true, conflicts_with = "preset")]
    pub config: Option<PathBuf>,

    /// Use a built-in configuration preset (offgrid, hybrid, ongrid)
    #[arg(long, global = true)]
    pub preset: Option<String>,

    /// Override the state file location
    #[arg(long, global = true)]
    pub state: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Add a device to the inventory
    Add(DeviceArgs),

    /// Change fields of an existing device
    Edit {
        /// Device index as shown by `list`
        index: usize,
        #[command(flatten)]
        fields: DeviceArgs,
    },

    /// Remove a device from the inventory
    Remove {
        /// Device index as shown by `list`
        index: usize,
    },

    /// Show the inventory and consumption totals
    List,

    /// Change system parameters
    Configure(ConfigureArgs),

    /// Size the installation for the current inventory
    Calculate {
        /// Also write the per-category breakdown to this CSV file
        #[arg(long)]
        breakdown_out: Option<PathBuf>,
    },

    /// Append devices from a CSV file (name,wattage_w,hours,count)
    Import {
        /// Input CSV path
        path: PathBuf,
    },

    /// Write the inventory to a CSV file
    Export {
        /// Output CSV path
        path: PathBuf,
    },

    /// Remove all devices and the last result, keeping the configuration
    Reset,

    /// Serve the REST API
    #[cfg(feature = "api")]
    Serve {
        /// Port to listen on
        #[arg(long, default_value_t = 3000)]
        port: u16,
    },
}

/// Device fields. Every field is optional here; `add` rejects incomplete
/// devices through the usual validation.
#[derive(Debug, Args)]
pub struct DeviceArgs {
    /// Device name
    #[arg(long)]
    pub name: Option<String>,

    /// Power draw per unit (W)
    #[arg(long)]
    pub wattage: Option<f64>,

    /// Daily usage (hours)
    #[arg(long)]
    pub hours: Option<f64>,

    /// Number of identical units
    #[arg(long)]
    pub count: Option<f64>,
}

impl DeviceArgs {
    /// Draft for `add`, with a single unit unless a count was given.
    pub fn into_draft(self) -> DeviceDraft {
        DeviceDraft {
            count: self.count.or(Some(1.0)),
            ..self.into_patch()
        }
    }

    pub fn into_patch(self) -> DevicePatch {
        DevicePatch {
            name: self.name,
            wattage: self.wattage,
            hours: self.hours,
            count: self.count,
        }
    }
}

#[derive(Debug, Args)]
pub struct ConfigureArgs {
    /// System type (offgrid, hybrid, ongrid)
    #[arg(long = "type")]
    pub system_type: Option<SystemType>,

    /// Average daily peak sun hours
    #[arg(long)]
    pub sun_hours: Option<f64>,

    /// Rated power of one panel (W)
    #[arg(long)]
    pub panel_wattage: Option<f64>,

    /// Capacity of one battery (Ah)
    #[arg(long)]
    pub battery_ah: Option<f64>,

    /// Safety margin (percent)
    #[arg(long)]
    pub safety_margin: Option<f64>,

    /// System losses (percent)
    #[arg(long)]
    pub system_loss: Option<f64>,
}

impl From<ConfigureArgs> for SystemConfigPatch {
    fn from(args: ConfigureArgs) -> Self {
        Self {
            system_type: args.system_type,
            sun_hours: args.sun_hours,
            panel_wattage: args.panel_wattage,
            battery_ah: args.battery_ah,
            safety_margin: args.safety_margin,
            system_loss: args.system_loss,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("solar-sizer").chain(args.iter().copied()))
    }

    #[test]
    fn add_defaults_count_to_one() {
        let cli = parse(&["add", "--name", "ثلاجة", "--wattage", "150", "--hours", "24"]);
        let Ok(Cli {
            command: Commands::Add(args),
            ..
        }) = cli
        else {
            panic!("expected add command");
        };
        assert_eq!(args.into_draft(), DeviceDraft::new("ثلاجة", 150.0, 24.0, 1.0));
    }

    #[test]
    fn edit_builds_partial_patch() {
        let cli = parse(&["edit", "2", "--hours", "3"]);
        let Ok(Cli {
            command: Commands::Edit { index, fields },
            ..
        }) = cli
        else {
            panic!("expected edit command");
        };
        assert_eq!(index, 2);
        let patch = fields.into_patch();
        assert_eq!(patch.hours, Some(3.0));
        assert_eq!(patch.name, None);
        assert_eq!(patch.count, None);
    }

    #[test]
    fn configure_parses_system_type() {
        let cli = parse(&["configure", "--type", "ongrid", "--sun-hours", "6"]);
        let Ok(Cli {
            command: Commands::Configure(args),
            ..
        }) = cli
        else {
            panic!("expected configure command");
        };
        let patch = SystemConfigPatch::from(args);
        assert_eq!(patch.system_type, Some(SystemType::OnGrid));
        assert_eq!(patch.sun_hours, Some(6.0));
        assert_eq!(patch.panel_wattage, None);
    }

    #[test]
    fn unknown_system_type_is_rejected() {
        assert!(parse(&["configure", "--type", "solar"]).is_err());
    }

    #[test]
    fn config_and_preset_conflict() {
        assert!(parse(&["--config", "a.toml", "--preset", "hybrid", "list"]).is_err());
    }

    #[test]
    fn global_options_after_subcommand() {
        let cli = parse(&["list", "--state", "/tmp/s.json"]);
        assert!(cli.is_ok_and(|c| c.state.as_deref() == Some(std::path::Path::new("/tmp/s.json"))));
    }
}
