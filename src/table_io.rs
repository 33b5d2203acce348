use crate::errors::{CorpusError, CorpusResult};
use crate::models::*;
use serde::Serialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

pub const STEMS_FILE: &str = "stems.csv";
pub const METADATA_FILE: &str = "metadatas.csv";
pub const DOCUMENTS_FILE: &str = "full-speeches.csv";

pub const INPUT_COLUMNS: [&str; 8] = [
    "speech",
    "id",
    "author_name",
    "author_party",
    "author_region",
    "date",
    "updated_at",
    "stage",
];

pub fn read_speeches(path: &Path) -> CorpusResult<Vec<CorpusResult<SpeechRow>>> {
    read_speeches_from(File::open(path)?)
}

/// Reads the speech table. Rows that cannot be decoded are returned as
/// record-level errors in their position, carrying the row's `id` cell when
/// it is readable; I/O failures and a missing input column fail the whole read.
pub fn read_speeches_from<R: Read>(input: R) -> CorpusResult<Vec<CorpusResult<SpeechRow>>> {
    // Row lengths are checked against the header below.
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);

    let headers = reader.headers()?.clone();
    let missing: Vec<&str> = INPUT_COLUMNS
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|h| h == *column))
        .collect();
    if !missing.is_empty() {
        return Err(CorpusError::MissingColumns(missing.join(", ")));
    }

    let id_position = headers.iter().position(|h| h == "id");
    let byte_headers = reader.byte_headers()?.clone();

    let mut rows = Vec::new();
    for result in reader.byte_records() {
        let record = match result {
            Ok(record) => record,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                rows.push(Err(CorpusError::malformed(e.to_string())));
                continue;
            }
        };

        let id = id_position
            .and_then(|pos| record.get(pos))
            .map(|cell| String::from_utf8_lossy(cell).trim().to_string())
            .filter(|cell| !cell.is_empty());

        if record.len() != byte_headers.len() {
            rows.push(Err(CorpusError::malformed_row(
                id,
                format!(
                    "found record with {} fields, but the header has {} fields",
                    record.len(),
                    byte_headers.len()
                ),
            )));
            continue;
        }

        match record.deserialize::<SpeechRow>(Some(&byte_headers)) {
            Ok(row) => rows.push(Ok(row)),
            Err(e) => rows.push(Err(CorpusError::malformed_row(id, e.to_string()))),
        }
    }

    Ok(rows)
}

#[derive(Debug, Clone)]
pub struct OutputFiles {
    pub stems: PathBuf,
    pub metadata: PathBuf,
    pub documents: PathBuf,
}

impl OutputFiles {
    pub fn in_dir(output_dir: &Path) -> Self {
        OutputFiles {
            stems: output_dir.join(STEMS_FILE),
            metadata: output_dir.join(METADATA_FILE),
            documents: output_dir.join(DOCUMENTS_FILE),
        }
    }

    pub fn all(&self) -> [&Path; 3] {
        [&self.stems, &self.metadata, &self.documents]
    }
}

pub fn write_tables(
    output_dir: &Path,
    tables: &CorpusTables,
    include_tokens: bool,
) -> CorpusResult<OutputFiles> {
    let files = OutputFiles::in_dir(output_dir);

    write_table(File::create(&files.stems)?, &["id", "stem"], &tables.stems)?;
    write_table(
        File::create(&files.metadata)?,
        &SpeechMetadata::COLUMNS,
        &tables.metadata,
    )?;

    let document_columns: &[&str] = if include_tokens {
        &["id", "original", "tokens"]
    } else {
        &["id", "original"]
    };
    write_table(
        File::create(&files.documents)?,
        document_columns,
        &tables.documents,
    )?;

    Ok(files)
}

/// Writes the header explicitly so empty tables still carry their columns.
pub fn write_table<W: Write, T: Serialize>(
    output: W,
    columns: &[&str],
    rows: &[T],
) -> CorpusResult<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(output);

    writer.write_record(columns)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const SPEECHES_CSV: &str = "\
speech,id,author_name,author_party,author_region,date,updated_at,stage
\"Sr. Presidente, voto sim.\",10,Fulano,PT,SP,2018-03-01,2018-03-02,PE
\"Discurso sem data\",11,Beltrana,PSDB,MG,,2018-03-02,GE
";

    #[test]
    fn test_read_speeches_with_empty_cells() {
        let rows = read_speeches_from(SPEECHES_CSV.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);

        let first = rows[0].as_ref().unwrap();
        assert_eq!(first.speech.as_deref(), Some("Sr. Presidente, voto sim."));
        assert_eq!(first.id.as_deref(), Some("10"));

        let second = rows[1].as_ref().unwrap();
        assert_eq!(second.date, None);
        assert_eq!(second.stage.as_deref(), Some("GE"));
    }

    #[test]
    fn test_ragged_row_is_record_level_error() {
        let csv = "\
speech,id,author_name,author_party,author_region,date,updated_at,stage
texto,1,a,b,c,d,e,f
texto,2,a,b
";
        let rows = read_speeches_from(csv.as_bytes()).unwrap();
        assert!(rows[0].is_ok());
        let err = rows[1].as_ref().unwrap_err();
        assert!(matches!(err, CorpusError::MalformedRecord { .. }));
        assert_eq!(err.record_id(), Some("2"));
        assert_eq!(
            err.to_string(),
            "malformed record: found record with 4 fields, but the header has 8 fields"
        );
    }

    #[test]
    fn test_undecodable_cell_keeps_row_id() {
        let mut csv = b"speech,id,author_name,author_party,author_region,date,updated_at,stage\n".to_vec();
        csv.extend_from_slice(b"texto,7,a,b,c,d,e,f\n");
        csv.extend_from_slice(b"texto \xff,8,a,b,c,d,e,f\n");

        let rows = read_speeches_from(csv.as_slice()).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].is_ok());
        assert_eq!(rows[1].as_ref().unwrap_err().record_id(), Some("8"));
    }

    #[test]
    fn test_ragged_row_without_id_cell() {
        let csv = "\
speech,id,author_name,author_party,author_region,date,updated_at,stage
texto
";
        let rows = read_speeches_from(csv.as_bytes()).unwrap();
        let err = rows[0].as_ref().unwrap_err();
        assert!(err.is_record_level());
        assert_eq!(err.record_id(), None);
    }

    #[test]
    fn test_missing_input_column_fails_read() {
        let csv = "speech,id,author_name\ntexto,1,a\n";
        let err = read_speeches_from(csv.as_bytes()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "input table is missing column(s): author_party, author_region, date, updated_at, stage"
        );
    }

    #[test]
    fn test_write_tables() {
        let temp_dir = TempDir::new().unwrap();
        let tables = CorpusTables {
            documents: vec![DocumentRow {
                id: "10".to_string(),
                original: "Voto \"sim\", Sr. Presidente".to_string(),
                tokens: Some("vot,sim,presid".to_string()),
            }],
            metadata: vec![SpeechMetadata {
                id: "10".to_string(),
                author_name: "Fulano".to_string(),
                author_party: "PT".to_string(),
                author_region: "SP".to_string(),
                date: "2018-03-01".to_string(),
                updated_at: "2018-03-02".to_string(),
                stage: "PE".to_string(),
            }],
            stems: vec![
                StemRow { id: 1, stem: "presid".to_string() },
                StemRow { id: 2, stem: "sim".to_string() },
            ],
        };

        let files = write_tables(temp_dir.path(), &tables, true).unwrap();

        assert_eq!(
            fs::read_to_string(&files.stems).unwrap(),
            "id,stem\n1,presid\n2,sim\n"
        );
        assert_eq!(
            fs::read_to_string(&files.metadata).unwrap(),
            "id,author_name,author_party,author_region,date,updated_at,stage\n\
             10,Fulano,PT,SP,2018-03-01,2018-03-02,PE\n"
        );
        assert_eq!(
            fs::read_to_string(&files.documents).unwrap(),
            "id,original,tokens\n10,\"Voto \"\"sim\"\", Sr. Presidente\",\"vot,sim,presid\"\n"
        );
    }

    #[test]
    fn test_empty_tables_keep_headers() {
        let temp_dir = TempDir::new().unwrap();
        let files = write_tables(temp_dir.path(), &CorpusTables::default(), false).unwrap();

        assert_eq!(fs::read_to_string(&files.stems).unwrap(), "id,stem\n");
        assert_eq!(fs::read_to_string(&files.documents).unwrap(), "id,original\n");
    }
}
