// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use clap::Parser;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use super::common::{
    check_paths, figure_saver, parse_range, split_arg_file, ARG_FILE_HELP, N_DIVS_HELP,
    OUTPUT_FORMAT_HELP, THRESHOLD_HELP,
};
use crate::{
    constants::{DEFAULT_TAVG_FREQ_RANGE, DEFAULT_TAVG_POWER_RANGE},
    kurtosis::SpectralKurtosis,
    plot::{plot_tavg_power, TavgPowerOptions},
    waterfall::Waterfall,
    RfiPlotError,
};

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct TavgPowerArgs {
    /// The SIGPROC filterbank file to plot.
    #[clap(name = "WATERFALL", parse(from_os_str))]
    pub(super) waterfall: Option<PathBuf>,

    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    /// The path to write the plot to.
    #[clap(short, long, parse(from_os_str))]
    pub(super) output: Option<PathBuf>,

    #[clap(long, help = OUTPUT_FORMAT_HELP.as_str())]
    pub(super) output_format: Option<String>,

    /// The frequency axis limits [MHz]. Default: 0 6000
    #[clap(
        long,
        number_of_values = 2,
        allow_hyphen_values = true,
        value_names = &["LOWER", "UPPER"]
    )]
    pub(super) freq_range: Option<Vec<f64>>,

    /// The power axis limits [counts]. Default: 0 5e10
    #[clap(
        long,
        number_of_values = 2,
        allow_hyphen_values = true,
        value_names = &["LOWER", "UPPER"]
    )]
    pub(super) power_range: Option<Vec<f64>>,

    #[clap(long, help = N_DIVS_HELP.as_str())]
    pub(super) n_divs: Option<usize>,

    #[clap(long, help = THRESHOLD_HELP.as_str())]
    pub(super) threshold: Option<f64>,

    /// Don't shade the frequency bins flagged as RFI.
    #[clap(long)]
    #[serde(default)]
    pub(super) hide_flagged_bins: bool,
}

impl TavgPowerArgs {
    /// Both command-line and file arguments overlap in terms of what is
    /// available; this function consolidates everything that was specified into
    /// a single struct. Where applicable, it will prefer CLI parameters over
    /// those in the file.
    pub(super) fn merge(self) -> Result<TavgPowerArgs, RfiPlotError> {
        debug!("Merging command-line arguments with the argument file");

        let (waterfall, args_file) = split_arg_file(self.waterfall, self.args_file);
        let cli_args = TavgPowerArgs {
            waterfall,
            args_file,
            ..self
        };

        if let Some(arg_file) = cli_args.args_file {
            let TavgPowerArgs {
                waterfall,
                args_file: _,
                output,
                output_format,
                freq_range,
                power_range,
                n_divs,
                threshold,
                hide_flagged_bins,
            } = unpack_arg_file!(arg_file);

            Ok(TavgPowerArgs {
                waterfall: cli_args.waterfall.or(waterfall),
                args_file: None,
                output: cli_args.output.or(output),
                output_format: cli_args.output_format.or(output_format),
                freq_range: cli_args.freq_range.or(freq_range),
                power_range: cli_args.power_range.or(power_range),
                n_divs: cli_args.n_divs.or(n_divs),
                threshold: cli_args.threshold.or(threshold),
                hide_flagged_bins: cli_args.hide_flagged_bins || hide_flagged_bins,
            })
        } else {
            Ok(cli_args)
        }
    }

    pub(super) fn parse(self) -> Result<(PathBuf, PathBuf, TavgPowerOptions), RfiPlotError> {
        // Expose all the struct fields to ensure they're all used.
        let TavgPowerArgs {
            waterfall,
            args_file: _,
            output,
            output_format,
            freq_range,
            power_range,
            n_divs,
            threshold,
            hide_flagged_bins,
        } = self;

        let (waterfall, output) = check_paths(waterfall, output)?;
        let defaults = TavgPowerOptions::default();
        let options = TavgPowerOptions {
            freq_range: parse_range("freq-range", freq_range, DEFAULT_TAVG_FREQ_RANGE)?,
            power_range: parse_range("power-range", power_range, DEFAULT_TAVG_POWER_RANGE)?,
            n_divs: n_divs.unwrap_or(defaults.n_divs),
            threshold: threshold.unwrap_or(defaults.threshold),
            show_flagged_bins: !hide_flagged_bins,
            output_format: output_format.unwrap_or(defaults.output_format),
        };
        Ok((waterfall, output, options))
    }

    pub(super) fn run(self, dry_run: bool) -> Result<(), RfiPlotError> {
        debug!("Converting arguments into parameters");
        trace!("{:#?}", self);
        let (waterfall_file, output, options) = self.parse()?;
        let saver = figure_saver()?;

        let waterfall = Waterfall::read(&waterfall_file)?;
        info!(
            "Waterfall {}: {} timesteps, {} IFs, {} channels",
            waterfall_file.display(),
            waterfall.num_timesteps(),
            waterfall.num_ifs(),
            waterfall.num_chans()
        );
        info!(
            "Frequency bins: {}, kurtosis threshold: {}",
            options.n_divs, options.threshold
        );
        info!(
            "Plotting to {} ({})",
            output.display(),
            options.output_format
        );

        if dry_run {
            info!("Dry run -- exiting now.");
            return Ok(());
        }

        plot_tavg_power(
            &waterfall,
            &SpectralKurtosis,
            saver.as_ref(),
            &output,
            &options,
        )?;
        Ok(())
    }
}
