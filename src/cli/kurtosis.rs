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
    constants::{DEFAULT_KURTOSIS_FREQ_RANGE, DEFAULT_KURTOSIS_RANGE},
    kurtosis::SpectralKurtosis,
    plot::{plot_mask_kurtosis, KurtosisPlotOptions},
    waterfall::Waterfall,
    RfiPlotError,
};

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct KurtosisArgs {
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

    /// The frequency axis limits [MHz]. If these and the kurtosis limits are
    /// all 0, the axes fit the data. Default: 2000 4000
    #[clap(
        long,
        number_of_values = 2,
        allow_hyphen_values = true,
        value_names = &["LOWER", "UPPER"]
    )]
    pub(super) freq_range: Option<Vec<f64>>,

    /// The kurtosis axis limits. Default: -5 500
    #[clap(
        long,
        number_of_values = 2,
        allow_hyphen_values = true,
        value_names = &["LOWER", "UPPER"]
    )]
    pub(super) kurtosis_range: Option<Vec<f64>>,

    #[clap(long, help = N_DIVS_HELP.as_str())]
    pub(super) n_divs: Option<usize>,

    #[clap(long, help = THRESHOLD_HELP.as_str())]
    pub(super) threshold: Option<f64>,

    /// Don't plot the kurtosis of every bin.
    #[clap(long)]
    #[serde(default)]
    pub(super) hide_unfiltered: bool,

    /// Don't plot the kurtosis of the bins that weren't flagged.
    #[clap(long)]
    #[serde(default)]
    pub(super) hide_clean: bool,

    /// Plot the kurtosis of the bins flagged as RFI.
    #[clap(long)]
    #[serde(default)]
    pub(super) show_rfi: bool,
}

impl KurtosisArgs {
    /// Consolidate the command-line arguments with those of the arguments
    /// file, preferring the command line.
    pub(super) fn merge(self) -> Result<KurtosisArgs, RfiPlotError> {
        debug!("Merging command-line arguments with the argument file");

        let (waterfall, args_file) = split_arg_file(self.waterfall, self.args_file);
        let cli_args = KurtosisArgs {
            waterfall,
            args_file,
            ..self
        };

        if let Some(arg_file) = cli_args.args_file {
            let KurtosisArgs {
                waterfall,
                args_file: _,
                output,
                output_format,
                freq_range,
                kurtosis_range,
                n_divs,
                threshold,
                hide_unfiltered,
                hide_clean,
                show_rfi,
            } = unpack_arg_file!(arg_file);

            Ok(KurtosisArgs {
                waterfall: cli_args.waterfall.or(waterfall),
                args_file: None,
                output: cli_args.output.or(output),
                output_format: cli_args.output_format.or(output_format),
                freq_range: cli_args.freq_range.or(freq_range),
                kurtosis_range: cli_args.kurtosis_range.or(kurtosis_range),
                n_divs: cli_args.n_divs.or(n_divs),
                threshold: cli_args.threshold.or(threshold),
                hide_unfiltered: cli_args.hide_unfiltered || hide_unfiltered,
                hide_clean: cli_args.hide_clean || hide_clean,
                show_rfi: cli_args.show_rfi || show_rfi,
            })
        } else {
            Ok(cli_args)
        }
    }

    pub(super) fn parse(self) -> Result<(PathBuf, PathBuf, KurtosisPlotOptions), RfiPlotError> {
        let KurtosisArgs {
            waterfall,
            args_file: _,
            output,
            output_format,
            freq_range,
            kurtosis_range,
            n_divs,
            threshold,
            hide_unfiltered,
            hide_clean,
            show_rfi,
        } = self;

        let (waterfall, output) = check_paths(waterfall, output)?;
        let defaults = KurtosisPlotOptions::default();
        let options = KurtosisPlotOptions {
            n_divs: n_divs.unwrap_or(defaults.n_divs),
            threshold: threshold.unwrap_or(defaults.threshold),
            show_unfiltered: !hide_unfiltered,
            show_clean: !hide_clean,
            show_flagged: show_rfi,
            freq_range: parse_range("freq-range", freq_range, DEFAULT_KURTOSIS_FREQ_RANGE)?,
            kurtosis_range: parse_range("kurtosis-range", kurtosis_range, DEFAULT_KURTOSIS_RANGE)?,
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
        debug!(
            "Showing unfiltered: {}, clean: {}, flagged: {}",
            options.show_unfiltered, options.show_clean, options.show_flagged
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

        plot_mask_kurtosis(
            &waterfall,
            &SpectralKurtosis,
            saver.as_ref(),
            &output,
            &options,
        )?;
        Ok(())
    }
}
