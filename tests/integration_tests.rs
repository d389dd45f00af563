//! Integration tests for csv-clusters

use csv_clusters::{
    BFloat16, ColumnType, CsvLoader, LoadedData, NumericMatrix, SourceType, StorageType,
    TableReader, export, generate_palette,
};
use palette::Srgba;
use std::io::Write;
use tempfile::{Builder, NamedTempFile};

fn temp_file(suffix: &str, contents: &[u8]) -> NamedTempFile {
    let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_color_column_colors_matching_group() {
    let data = b"id,color,group\n1,red,A\n2,red,A\n3,blue,B\n";
    let loader = CsvLoader::new();

    let output = loader.load_bytes(data).unwrap().unwrap();
    let LoadedData::Mixed(mixed) = &output.data else {
        panic!("expected mixed data");
    };

    assert_eq!(
        mixed.column_types,
        vec![ColumnType::Numerical, ColumnType::Color, ColumnType::Categorical]
    );
    assert_eq!(mixed.clusters.len(), 1);

    let set = &mixed.clusters[0];
    assert_eq!(set.name, "group");
    assert_eq!(set.color_column, Some(1));
    let a = set.cluster("A").unwrap();
    assert_eq!(a.indices, vec![0, 1]);
    assert_eq!(a.color, Srgba::new(255, 0, 0, 255));
    let b = set.cluster("B").unwrap();
    assert_eq!(b.indices, vec![2]);
    assert_eq!(b.color, Srgba::new(0, 0, 255, 255));

    let numeric = mixed.numeric.as_ref().unwrap();
    assert_eq!(numeric.column_header(), &["id".to_string()]);
    assert_eq!(numeric.get_f32(2, 0), Some(3.0));
}

#[test]
fn test_load_path_names_dataset_after_file() {
    let file = temp_file(".csv", b"x,y\n1,2\n3,4\n");
    let mut loader = CsvLoader::new();
    loader.source_type(SourceType::Numerical);

    let output = loader.load_path(file.path()).unwrap().unwrap();
    let stem = file.path().file_stem().unwrap().to_string_lossy();
    assert_eq!(output.name, stem);
    assert_eq!(output.numeric().unwrap().rows(), 2);
}

#[test]
fn test_tsv_extension_uses_tab() {
    let file = temp_file(".tsv", b"x\ty\n1\t2\n");
    let mut loader = CsvLoader::new();
    loader.source_type(SourceType::Numerical).separator(b';');

    let output = loader.load_path(file.path()).unwrap().unwrap();
    let m = output.numeric().unwrap();
    assert_eq!(m.column_header(), &["x".to_string(), "y".to_string()]);
    assert_eq!(m.get_f32(0, 1), Some(2.0));
}

#[test]
fn test_unreadable_path_is_nothing_to_load() {
    let loader = CsvLoader::new();
    let result = loader.load_path("/nonexistent/path/to/table.csv").unwrap();
    assert!(result.is_none());
}

#[test]
fn test_quoted_fields_and_whitespace() {
    let data = b"name,value\n\"a,b\", 1 \n c ,2\n";
    let mut loader = CsvLoader::new();
    loader.row_header(true).source_type(SourceType::Numerical);

    let output = loader.load_bytes(data).unwrap().unwrap();
    let m = output.numeric().unwrap();
    assert_eq!(m.row_header(), &["a,b".to_string(), "c".to_string()]);
    assert_eq!(m.get_f32(0, 0), Some(1.0));
    assert_eq!(m.get_f32(1, 0), Some(2.0));
}

#[test]
fn test_missing_corner_label() {
    // The header names only the data columns.
    let data = b"x,y\ns0,1,2\ns1,3,4\n";
    let mut loader = CsvLoader::new();
    loader.row_header(true).source_type(SourceType::Numerical);

    let output = loader.load_bytes(data).unwrap().unwrap();
    assert_eq!(output.corner_label, None);
    let m = output.numeric().unwrap();
    assert_eq!(m.column_header(), &["x".to_string(), "y".to_string()]);
    assert_eq!(m.row_header(), &["s0".to_string(), "s1".to_string()]);
    assert_eq!(m.get_f32(1, 1), Some(4.0));
}

#[test]
fn test_transposed_load() {
    let data = b"id,x,y,z\na,1,2,3\nb,4,5,6\n";
    let mut loader = CsvLoader::new();
    loader
        .row_header(true)
        .transposed(true)
        .source_type(SourceType::Numerical);

    let output = loader.load_bytes(data).unwrap().unwrap();
    let m = output.numeric().unwrap();
    assert_eq!(m.rows(), 3);
    assert_eq!(m.columns(), 2);
    assert_eq!(m.row_header(), &["x".to_string(), "y".to_string(), "z".to_string()]);
    assert_eq!(m.column_header(), &["a".to_string(), "b".to_string()]);
    assert_eq!(m.get_f32(2, 1), Some(6.0));
}

#[test]
fn test_transpose_symmetry() {
    let data = b"id,x,y,z\na,1,2,3\nb,4,5,6\nc,7,8,9\n";

    let mut straight = TableReader::new(b',', true, true).unwrap();
    straight.read_bytes(data);
    let plain = straight.extract_all::<f32>(false).unwrap();

    let mut flipped = TableReader::new(b',', true, true).unwrap();
    flipped.read_bytes(data);
    let transposed = flipped.extract_all::<f32>(true).unwrap();

    assert_eq!(plain.transposed(), transposed);
}

#[test]
fn test_parent_labels_align_samples() {
    let data = b"id,x\na,1\nb,2\nc,3\n";
    let mut loader = CsvLoader::new();
    loader
        .row_header(true)
        .source_type(SourceType::Numerical)
        .parent_labels(vec!["c".into(), "missing".into(), "a".into()]);

    let output = loader.load_bytes(data).unwrap().unwrap();
    let m = output.numeric().unwrap();
    assert_eq!(
        m.row_header(),
        &["c".to_string(), "missing".to_string(), "a".to_string()]
    );
    assert_eq!(m.get_f32(0, 0), Some(3.0));
    assert_eq!(m.get_f32(1, 0), Some(0.0));
    assert_eq!(m.get_f32(2, 0), Some(1.0));
}

#[test]
fn test_dimension_subset() {
    let data = b"x,y,z\n1,2,3\n4,5,6\n";
    let mut loader = CsvLoader::new();
    loader
        .source_type(SourceType::Numerical)
        .dimension_labels(vec!["z".into(), "x".into()]);

    let output = loader.load_bytes(data).unwrap().unwrap();
    let m = output.numeric().unwrap();
    assert_eq!(m.column_header(), &["z".to_string(), "x".to_string()]);
    assert_eq!(m.get_f32(0, 0), Some(3.0));
    assert_eq!(m.get_f32(1, 1), Some(4.0));
}

#[test]
fn test_unmatched_dimension_is_zero_filled() {
    let mut loader = CsvLoader::new();
    loader
        .source_type(SourceType::Numerical)
        .dimension_labels(vec!["unknown".into()]);
    // Unmatched labels still give zero-filled columns.
    let output = loader.load_bytes(b"x\n1\n").unwrap().unwrap();
    assert_eq!(output.numeric().unwrap().get_f32(0, 0), Some(0.0));
}

#[test]
fn test_bfloat16_storage() {
    let data = b"x,y\n1.5,1e39\n";
    let mut loader = CsvLoader::new();
    loader
        .source_type(SourceType::Numerical)
        .storage_type(StorageType::BFloat16);

    let output = loader.load_bytes(data).unwrap().unwrap();
    let LoadedData::Numeric(NumericMatrix::BFloat16(m)) = &output.data else {
        panic!("expected bfloat16 data");
    };
    assert_eq!(m.get(0, 0), Some(&BFloat16::from_f32(1.5)));
    assert_eq!(m.get(0, 1), Some(&BFloat16::MAX));
}

#[test]
fn test_categorical_source_keeps_numbers_as_categories() {
    let data = b"grade\n1\n2\n1\n";
    let mut loader = CsvLoader::new();
    loader.source_type(SourceType::Categorical);

    let output = loader.load_bytes(data).unwrap().unwrap();
    let LoadedData::Mixed(mixed) = &output.data else {
        panic!("expected mixed data");
    };
    assert_eq!(mixed.column_types, vec![ColumnType::Categorical]);
    assert!(mixed.numeric.is_none());

    let set = &mixed.clusters[0];
    assert_eq!(set.cluster("1").unwrap().indices, vec![0, 2]);
    assert_eq!(set.cluster("2").unwrap().indices, vec![1]);
    let colors: Vec<_> = set.clusters.iter().map(|c| c.color).collect();
    assert_eq!(colors, generate_palette(2));
}

#[test]
fn test_standalone_color_column() {
    let data = b"tint\n#ff0000\n#00f\n\n#ff0000\n";
    let loader = CsvLoader::new();

    let output = loader.load_bytes(data).unwrap().unwrap();
    let clusters = output.clusters();
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].column_type, ColumnType::Color);
    let red = clusters[0].cluster("#ff0000").unwrap();
    assert_eq!(red.indices, vec![0, 2]);
    assert_eq!(red.color, Srgba::new(255, 0, 0, 255));
}

#[test]
fn test_utf8_bom_is_skipped() {
    let data = b"\xEF\xBB\xBFx,y\n1,2\n";
    let mut loader = CsvLoader::new();
    loader.source_type(SourceType::Numerical);

    let output = loader.load_bytes(data).unwrap().unwrap();
    assert_eq!(
        output.numeric().unwrap().column_header(),
        &["x".to_string(), "y".to_string()]
    );
}

#[test]
fn test_export_round_trip_through_loader() {
    let data = b"id,x,y\na,1.5,2\nb,3,4\n";
    let mut loader = CsvLoader::new();
    loader.row_header(true).source_type(SourceType::Numerical);
    let output = loader.load_bytes(data).unwrap().unwrap();

    let mut out = Vec::new();
    export::write_numeric(
        &mut out,
        output.numeric().unwrap(),
        output.corner_label.as_deref().unwrap_or_default(),
        b',',
    )
    .unwrap();
    assert_eq!(String::from_utf8(out.clone()).unwrap(), "id,x,y\na,1.5,2\nb,3,4\n");

    let again = loader.load_bytes(&out).unwrap().unwrap();
    assert_eq!(again.data, output.data);
}

#[test]
fn test_export_clusters() {
    let data = b"id,color,group\n1,red,A\n2,red,A\n3,blue,B\n";
    let mut loader = CsvLoader::new();
    loader.row_header(true);
    let output = loader.load_bytes(data).unwrap().unwrap();
    let LoadedData::Mixed(mixed) = &output.data else {
        panic!("expected mixed data");
    };

    let mut out = Vec::new();
    export::write_clusters(&mut out, &mixed.clusters, &mixed.row_header, b',').unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "set,cluster,color,sample\n\
         group,A,#ff0000,1\n\
         group,A,#ff0000,2\n\
         group,B,#0000ff,3\n"
    );
}
