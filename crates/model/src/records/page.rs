use crate::{core::data_type::DataType, records::record::Record};

/// A bounded batch of records fetched at a given offset.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub offset: usize,
    pub records: Vec<Record>,
    /// Matching rows the source reports for the whole query, when it does.
    pub total: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnShape {
    pub name: String,
    pub data_type: DataType,
}

impl Page {
    pub fn new(offset: usize, records: Vec<Record>) -> Self {
        Page {
            offset,
            records,
            total: None,
        }
    }

    pub fn with_total(mut self, total: Option<usize>) -> Self {
        self.total = total;
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Offset of the page that follows this one: advances by the rows
    /// actually received, never by the requested limit.
    pub fn next_offset(&self) -> usize {
        self.offset + self.records.len()
    }

    /// True when no page can follow: this one is empty, or it reaches the
    /// reported total. Without a total only an empty page ends the scan.
    pub fn is_last(&self) -> bool {
        self.is_empty() || self.total.is_some_and(|total| self.next_offset() >= total)
    }

    pub fn trim_text(&mut self, field: &str) {
        for record in &mut self.records {
            record.trim_text(field);
        }
    }

    /// Columns in first-seen order, each typed with the widest type
    /// observed across the page.
    pub fn shape(&self) -> Vec<ColumnShape> {
        let mut shape: Vec<ColumnShape> = Vec::new();
        for record in &self.records {
            for fv in &record.field_values {
                let observed = fv.value.data_type();
                match shape.iter_mut().find(|c| c.name == fv.name) {
                    Some(col) => col.data_type = col.data_type.widen(&observed),
                    None => shape.push(ColumnShape {
                        name: fv.name.clone(),
                        data_type: observed,
                    }),
                }
            }
        }
        shape
    }

    pub fn size_bytes(&self) -> usize {
        self.records.iter().map(|r| r.size_bytes()).sum()
    }
}
