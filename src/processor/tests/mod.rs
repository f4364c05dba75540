//! Integration tests for the processor module
//!
//! Tests the complete processing pipeline using mock cache directories.


use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub(crate) const NYA_GAME: &str = r#"id,NYA202304070
version,2
info,visteam,PHI
info,hometeam,NYA
info,site,NYC21
start,schwk001,"Kyle Schwarber",0,1,7
start,judga001,"Aaron Judge",1,2,9
start,coleg001,"Gerrit Cole",1,0,1
play,1,0,schwk001,22,BCFBX,S7
play,1,1,judga001,32,BBCFBX,HR/F89
com,"Judge, first homer of the year"
sub,rizza001,"Anthony Rizzo",1,2,11
play,9,1,rizza001,01,CX,63/G
data,er,coleg001,1
"#;

pub(crate) const BOS_GAME: &str = r#"id,BOS202304081
version,2
info,visteam,NYA
info,hometeam,BOS
info,daynight,day
start,verdj001,"Jarren Duran",1,1,8
play,1,0,judga001,??,,K
play,1,1,verdj001,00,X,D8/L
"#;

/// Create `<root>/cache/<stem>/<file>` entries and return (cache, output) paths
pub(crate) fn create_cache(temp_dir: &TempDir, files: &[(&str, &str, &str)]) -> (PathBuf, PathBuf) {
    let cache = temp_dir.path().join("cache");
    fs::create_dir_all(&cache).unwrap();
    for (stem, name, content) in files {
        let dir = cache.join(stem);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(name), content).unwrap();
    }
    (cache, temp_dir.path().join("output"))
}

pub(crate) fn read_table(path: &Path) -> polars::prelude::DataFrame {
    use polars::prelude::*;
    ParquetReader::new(fs::File::open(path).unwrap())
        .finish()
        .unwrap()
}
