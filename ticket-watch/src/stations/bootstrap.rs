//! Built-in stations used when the remote station list cannot be fetched.

use crate::domain::{Station, StationCode};

use super::directory::StationDirectory;

/// (name, code, pinyin, abbreviation) for major stations.
const BOOTSTRAP_STATIONS: &[(&str, &str, &str, &str)] = &[
    ("北京", "BJP", "beijing", "bj"),
    ("北京南", "VNP", "beijingnan", "bjn"),
    ("上海", "SHH", "shanghai", "sh"),
    ("上海虹桥", "AOH", "shanghaihongqiao", "shhq"),
    ("天津", "TJP", "tianjin", "tj"),
    ("南京", "NJH", "nanjing", "nj"),
    ("南京南", "NKH", "nanjingnan", "njn"),
    ("常州", "CZH", "changzhou", "cz"),
    ("杭州", "HZH", "hangzhou", "hz"),
    ("杭州东", "HGH", "hangzhoudong", "hzd"),
    ("广州", "GZQ", "guangzhou", "gz"),
    ("广州南", "IZQ", "guangzhounan", "gzn"),
    ("深圳", "SZQ", "shenzhen", "sz"),
    ("武汉", "WHN", "wuhan", "wh"),
    ("成都", "CDW", "chengdu", "cd"),
    ("重庆", "CQW", "chongqing", "cq"),
    ("西安", "XAY", "xian", "xa"),
    ("长沙", "CSQ", "changsha", "cs"),
];

/// Directory holding the built-in stations.
pub fn bootstrap_directory() -> StationDirectory {
    BOOTSTRAP_STATIONS
        .iter()
        .filter_map(|&(name, code, pinyin, abbrev)| {
            StationCode::parse(code)
                .ok()
                .map(|code| Station::new(name, code, pinyin, abbrev))
        })
        .collect()
}
