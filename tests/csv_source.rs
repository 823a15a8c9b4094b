use std::fs;
use std::path::PathBuf;

use ferrite_tune::read_and_split_data;

fn write_temp(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("ferrite-tune-{}-{}", std::process::id(), name));
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn label_column_is_split_off_wherever_it_sits() {
    let train = write_temp("train.csv", "a,label,b\n1.0,1,2.0\n3.0,0,4.0\n");
    let test = write_temp("test.csv", "a,b\n5.0,6.0\n");

    let data = read_and_split_data(&train, Some(test.as_path()), "label").unwrap();
    fs::remove_file(&train).ok();
    fs::remove_file(&test).ok();

    assert_eq!(data.feature_names, vec!["a", "b"]);
    assert_eq!(data.x_train.data, vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
    assert_eq!(data.y_train, vec![1.0, 0.0]);
    assert_eq!(data.x_test.unwrap().data, vec![vec![5.0, 6.0]]);
}

#[test]
fn test_file_label_column_is_dropped() {
    let train = write_temp("train2.csv", "a,b,y\n1,2,0\n");
    let test = write_temp("test2.csv", "a,b,y\n3,4,1\n");

    let data = read_and_split_data(&train, Some(test.as_path()), "y").unwrap();
    fs::remove_file(&train).ok();
    fs::remove_file(&test).ok();

    assert_eq!(data.x_test.unwrap().data, vec![vec![3.0, 4.0]]);
}

#[test]
fn bad_inputs_are_reported() {
    let missing_label = write_temp("nolabel.csv", "a,b\n1,2\n");
    let not_numeric = write_temp("text.csv", "a,label\nhello,1\n");
    let ragged = write_temp("ragged.csv", "a,label\n1,0\n2\n");
    let empty = write_temp("empty.csv", "a,label\n");

    for path in [&missing_label, &not_numeric, &ragged, &empty] {
        assert!(read_and_split_data(path, None, "label").is_err(), "{} should fail", path.display());
        fs::remove_file(path).ok();
    }
}

#[test]
fn header_only_test_file_is_rejected() {
    let train = write_temp("train3.csv", "a,b,label\n1,2,0\n3,4,1\n");
    let test = write_temp("test3.csv", "a,b\n");

    let result = read_and_split_data(&train, Some(test.as_path()), "label");
    fs::remove_file(&train).ok();
    fs::remove_file(&test).ok();

    let err = result.expect_err("a test file without rows should fail");
    assert!(err.to_string().contains("no data rows"), "unexpected error: {}", err);
}
