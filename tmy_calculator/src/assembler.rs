use crate::models::{NormalizedRecord, TmmSelection, TmySeries};
use log::info;

pub struct TmyAssembler;

impl TmyAssembler {
    /// Concatenate each selected month/year block, January first, whatever
    /// order the selections arrive in. Records keep their relative order.
    pub fn assemble(selections: &[TmmSelection], records: &[NormalizedRecord]) -> TmySeries {
        let mut ordered: Vec<&TmmSelection> = selections.iter().collect();
        ordered.sort_by_key(|selection| selection.month);

        let mut series = TmySeries::default();
        for selection in ordered {
            series.records.extend(records.iter().filter(|r| {
                r.month == selection.month && r.year == selection.representative_year
            }));
        }

        info!("Assembled TMY series with {} records", series.len());
        series
    }
}
