//! Instrument response built from ARF/RMF text tables.
//!
//! The response matrix maps incident photon flux in input energy intervals onto
//! counts in detector channels:
//! `matrix[channel][input] = RMF[input][channel] * ARF[input][effective area column]`.
use crate::{Error, ErrorKind, Result};
use log::{debug, info};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::ops::Range;
use std::path::Path;

/// Column of an ARF table holding the lower edge of each input energy interval.
const ARF_LOW_ENERGY_COLUMN: usize = 1;

/// Column of an ARF table holding the upper edge of each input energy interval.
const ARF_HIGH_ENERGY_COLUMN: usize = 2;

/// Column of an ARF table holding the effective area.
const ARF_AREA_COLUMN: usize = 3;

/// Numerical table read from a whitespace-delimited text file.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    rows: Vec<Vec<f64>>,
    columns: usize,
}
impl Table {
    /// Reads a table, skipping the first `skip_rows` lines.
    ///
    /// Blank lines and lines starting with `#` are ignored.
    ///
    /// # Errors
    ///
    /// An `ErrorKind::InvalidInput` error is returned if a value is not a number or if
    /// the rows do not share the same number of columns.
    pub fn read<R: BufRead>(reader: R, skip_rows: usize) -> Result<Self> {
        let mut rows = Vec::new();
        let mut columns = None;
        for (i, line) in reader.lines().enumerate().skip(skip_rows) {
            let line = track!(line.map_err(Error::from); i)?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let row = line
                .split_whitespace()
                .map(|token| track!(token.parse::<f64>().map_err(Error::from); i, token))
                .collect::<Result<Vec<_>>>()?;
            let n = *columns.get_or_insert(row.len());
            track_assert_eq!(row.len(), n, ErrorKind::InvalidInput);
            rows.push(row);
        }
        Ok(Self {
            rows,
            columns: columns.unwrap_or(0),
        })
    }

    /// Reads a table from the file at `path`.
    pub fn from_path<P: AsRef<Path>>(path: P, skip_rows: usize) -> Result<Self> {
        let path = path.as_ref();
        let file = track!(File::open(path).map_err(Error::from); path)?;
        let table = track!(Self::read(BufReader::new(file), skip_rows); path)?;
        debug!(
            "Loaded {:?}: {} rows x {} columns",
            path,
            table.rows.len(),
            table.columns
        );
        Ok(table)
    }

    /// Returns the number of rows.
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Returns the number of columns.
    pub fn num_columns(&self) -> usize {
        self.columns
    }

    /// Returns the value at (`row`, `column`).
    pub fn get(&self, row: usize, column: usize) -> Option<f64> {
        self.rows.get(row).and_then(|r| r.get(column)).cloned()
    }

    fn at(&self, row: usize, column: usize) -> f64 {
        self.rows[row][column]
    }
}

/// Builder of `Instrument`.
#[derive(Debug, Clone)]
pub struct InstrumentBuilder {
    channels: Range<usize>,
    arf_skip_rows: usize,
    rmf_skip_rows: usize,
    edges_skip_rows: usize,
}
impl InstrumentBuilder {
    /// Makes a new `InstrumentBuilder` with the NICER (v1.01 response) settings.
    pub fn new() -> Self {
        Self {
            channels: 20..201,
            arf_skip_rows: 3,
            rmf_skip_rows: 0,
            edges_skip_rows: 3,
        }
    }

    /// Sets the detector channels retained in the response matrix.
    ///
    /// # Errors
    ///
    /// If `channels` is empty, an `ErrorKind::InvalidInput` error is returned.
    pub fn channels(&mut self, channels: Range<usize>) -> Result<&mut Self> {
        track_assert!(channels.start < channels.end, ErrorKind::InvalidInput; channels);
        self.channels = channels;
        Ok(self)
    }

    /// Sets the number of header lines of ARF files.
    pub fn arf_skip_rows(&mut self, n: usize) -> &mut Self {
        self.arf_skip_rows = n;
        self
    }

    /// Sets the number of header lines of RMF files.
    pub fn rmf_skip_rows(&mut self, n: usize) -> &mut Self {
        self.rmf_skip_rows = n;
        self
    }

    /// Sets the number of header lines of channel energy-map files.
    pub fn edges_skip_rows(&mut self, n: usize) -> &mut Self {
        self.edges_skip_rows = n;
        self
    }

    /// Loads the response files and builds an `Instrument` for the input intervals `inputs`.
    pub fn load<P: AsRef<Path>>(
        &self,
        arf: P,
        rmf: P,
        channel_edges: Option<P>,
        inputs: Range<usize>,
    ) -> Result<Instrument> {
        let arf = track!(Table::from_path(arf, self.arf_skip_rows))?;
        let rmf = track!(Table::from_path(rmf, self.rmf_skip_rows))?;
        let edges = match channel_edges {
            Some(path) => Some(track!(Table::from_path(path, self.edges_skip_rows))?),
            None => None,
        };
        track!(self.finish(&arf, &rmf, edges.as_ref(), inputs))
    }

    /// Builds an `Instrument` from already loaded tables.
    ///
    /// # Errors
    ///
    /// An `ErrorKind::InvalidInput` error is returned if `inputs` is empty or if a table
    /// lacks the rows or columns addressed by `inputs` and the channel range.
    pub fn finish(
        &self,
        arf: &Table,
        rmf: &Table,
        channel_edges: Option<&Table>,
        inputs: Range<usize>,
    ) -> Result<Instrument> {
        let channels = self.channels.clone();
        track_assert!(inputs.start < inputs.end, ErrorKind::InvalidInput; inputs);
        track_assert!(inputs.end <= arf.num_rows(), ErrorKind::InvalidInput; inputs, arf.num_rows());
        track_assert!(inputs.end <= rmf.num_rows(), ErrorKind::InvalidInput; inputs, rmf.num_rows());
        track_assert!(ARF_AREA_COLUMN < arf.num_columns(), ErrorKind::InvalidInput; arf.num_columns());
        track_assert!(channels.end <= rmf.num_columns(), ErrorKind::InvalidInput;
                      channels, rmf.num_columns());

        let matrix = channels
            .clone()
            .map(|c| {
                inputs
                    .clone()
                    .map(|k| rmf.at(k, c) * arf.at(k, ARF_AREA_COLUMN))
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();

        let mut energy_edges = Vec::with_capacity(inputs.len() + 1);
        energy_edges.push(arf.at(inputs.start, ARF_LOW_ENERGY_COLUMN));
        energy_edges.extend(inputs.clone().map(|k| arf.at(k, ARF_HIGH_ENERGY_COLUMN)));

        let channel_edges = match channel_edges {
            None => None,
            Some(table) => {
                // One more edge than channels; the edge lies in the second-to-last column.
                let rows = channels.start..channels.end + 1;
                track_assert!(rows.end <= table.num_rows(), ErrorKind::InvalidInput;
                              rows, table.num_rows());
                track_assert!(table.num_columns() >= 3, ErrorKind::InvalidInput; table.num_columns());
                let column = table.num_columns() - 2;
                Some(rows.map(|r| table.at(r, column)).collect::<Vec<_>>())
            }
        };

        info!(
            "Built instrument response: {} channels x {} input intervals",
            channels.len(),
            inputs.len()
        );
        Ok(Instrument {
            channels,
            matrix,
            energy_edges,
            channel_edges,
        })
    }
}
impl Default for InstrumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Response of a telescope: effective area times redistribution.
#[derive(Debug, Clone, PartialEq)]
pub struct Instrument {
    channels: Range<usize>,
    matrix: Vec<Vec<f64>>,
    energy_edges: Vec<f64>,
    channel_edges: Option<Vec<f64>>,
}
impl Instrument {
    /// Builds an `Instrument` from response files using the default `InstrumentBuilder` settings.
    pub fn from_response_files<P: AsRef<Path>>(
        arf: P,
        rmf: P,
        channel_edges: Option<P>,
        inputs: Range<usize>,
    ) -> Result<Self> {
        track!(InstrumentBuilder::new().load(arf, rmf, channel_edges, inputs))
    }

    /// Returns the detector channels.
    pub fn channels(&self) -> Range<usize> {
        self.channels.clone()
    }

    /// Returns the response matrix (one row per channel, one column per input interval).
    pub fn matrix(&self) -> &[Vec<f64>] {
        &self.matrix
    }

    /// Returns the edges of the input energy intervals [keV].
    pub fn energy_edges(&self) -> &[f64] {
        &self.energy_edges
    }

    /// Returns the channel energy edges [keV], if an energy map was given.
    pub fn channel_edges(&self) -> Option<&[f64]> {
        self.channel_edges.as_ref().map(|x| &x[..])
    }

    /// Returns the number of input energy intervals.
    pub fn num_inputs(&self) -> usize {
        self.energy_edges.len() - 1
    }

    /// Folds a signal through the response.
    ///
    /// `signal` has one row per input interval and one column per phase; the result has one
    /// row per channel.
    ///
    /// # Errors
    ///
    /// If the shape of `signal` does not match, an `ErrorKind::InvalidInput` error is returned.
    pub fn fold(&self, signal: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        track_assert_eq!(signal.len(), self.num_inputs(), ErrorKind::InvalidInput);
        let phases = signal.first().map_or(0, |row| row.len());
        for (k, row) in signal.iter().enumerate() {
            track_assert!(row.len() == phases, ErrorKind::InvalidInput; k, phases);
        }

        let folded = self
            .matrix
            .iter()
            .map(|response| {
                (0..phases)
                    .map(|j| {
                        response
                            .iter()
                            .zip(signal.iter())
                            .map(|(r, s)| r * s[j])
                            .sum::<f64>()
                    })
                    .collect()
            })
            .collect();
        Ok(folded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trackable::result::TestResult;

    const ARF: &str = "\
header
header
header
0 0.1 0.2 10.0
1 0.2 0.3 20.0
2 0.3 0.4 30.0
";

    const RMF: &str = "\
0.1 0.2 0.3 0.4
0.5 0.6 0.7 0.8

0.9 1.0 1.1 1.2
";

    const EDGES: &str = "\
h
h
h
0 0 1.0 0
1 0 2.0 0
2 0 3.0 0
3 0 4.0 0
";

    fn builder() -> Result<InstrumentBuilder> {
        let mut builder = InstrumentBuilder::new();
        track!(builder.channels(1..3))?;
        Ok(builder)
    }

    #[test]
    fn table_read_works() -> TestResult {
        let table = track!(Table::read(ARF.as_bytes(), 3))?;
        assert_eq!(table.num_rows(), 3);
        assert_eq!(table.num_columns(), 4);
        assert_eq!(table.get(1, 3), Some(20.0));
        assert_eq!(table.get(3, 0), None);

        let table = track!(Table::read(RMF.as_bytes(), 0))?;
        assert_eq!(table.num_rows(), 3);
        Ok(())
    }

    #[test]
    fn malformed_tables_are_rejected() {
        assert!(Table::read("1 2\n3\n".as_bytes(), 0).is_err());
        assert!(Table::read("1 foo\n".as_bytes(), 0).is_err());
    }

    #[test]
    fn instrument_works() -> TestResult {
        let arf = track!(Table::read(ARF.as_bytes(), 3))?;
        let rmf = track!(Table::read(RMF.as_bytes(), 0))?;
        let edges = track!(Table::read(EDGES.as_bytes(), 3))?;
        let instrument = track!(track!(builder())?.finish(&arf, &rmf, Some(&edges), 1..3))?;

        assert_eq!(instrument.channels(), 1..3);
        assert_eq!(instrument.num_inputs(), 2);
        assert_eq!(instrument.energy_edges(), &[0.2, 0.3, 0.4][..]);
        assert_eq!(instrument.channel_edges(), Some(&[2.0, 3.0, 4.0][..]));

        let m = instrument.matrix();
        assert_eq!(m.len(), 2);
        assert!((m[0][0] - 0.6 * 20.0).abs() < 1e-12);
        assert!((m[0][1] - 1.0 * 30.0).abs() < 1e-12);
        assert!((m[1][0] - 0.7 * 20.0).abs() < 1e-12);
        assert!((m[1][1] - 1.1 * 30.0).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn out_of_range_inputs_are_rejected() -> TestResult {
        let arf = track!(Table::read(ARF.as_bytes(), 3))?;
        let rmf = track!(Table::read(RMF.as_bytes(), 0))?;
        let builder = track!(builder())?;
        assert!(builder.finish(&arf, &rmf, None, 2..4).is_err());
        assert!(builder.finish(&arf, &rmf, None, 1..1).is_err());
        assert!(InstrumentBuilder::new().finish(&arf, &rmf, None, 0..3).is_err());
        Ok(())
    }

    #[test]
    fn fold_works() -> TestResult {
        let arf = track!(Table::read(ARF.as_bytes(), 3))?;
        let rmf = track!(Table::read(RMF.as_bytes(), 0))?;
        let instrument = track!(track!(builder())?.finish(&arf, &rmf, None, 0..2))?;
        assert_eq!(instrument.channel_edges(), None);

        let signal = vec![vec![1.0, 0.0, 2.0], vec![0.0, 1.0, 1.0]];
        let folded = track!(instrument.fold(&signal))?;
        assert_eq!(folded.len(), 2);
        assert_eq!(folded[0].len(), 3);

        let (a, b) = (0.2 * 10.0, 0.6 * 20.0);
        assert!((folded[0][0] - a).abs() < 1e-12);
        assert!((folded[0][1] - b).abs() < 1e-12);
        assert!((folded[0][2] - (2.0 * a + b)).abs() < 1e-12);

        assert!(instrument.fold(&signal[..1]).is_err());
        assert!(instrument.fold(&[vec![1.0], vec![1.0, 2.0]]).is_err());
        Ok(())
    }

    #[test]
    fn missing_file_is_io_error() {
        let e = Table::from_path("/nonexistent/arf.txt", 3).err().unwrap();
        match *e.kind() {
            ErrorKind::IoError => {}
            ref k => panic!("unexpected kind: {:?}", k),
        }
    }
}
