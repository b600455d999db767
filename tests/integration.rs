//! Integration tests for loading real-shaped exports from disk.

use std::io::Write;
use std::path::Path;

use kakaopack::prelude::*;
use kakaopack::{LoadErrorKind, LoadState};
use tempfile::NamedTempFile;

/// A transcript as saved by the desktop client, including the export
/// banner, join notices and one message that wraps onto a second line.
const TRANSCRIPT_LINES: &[&str] = &[
    "LLM RAG Langchain 통합 님과 카카오톡 대화\n",
    "저장한 날짜 : 2024-04-05 01:36:14\n",
    "\n",
    "--------------- 2024년 3월 27일 수요일 ---------------\n",
    "TEST님이 들어왔습니다.타인, 기관 등의 사칭에 유의해 주세요. 금전 또는개인정보를 요구 받을 경우 신고해 주시기 바랍니다.운영정책을 위반한 메시지로 신고 접수 시 카카오톡 이용에 제한이 있을 수 있습니다. \n",
    "불법촬영물등 식별 및 게재제한 조치 안내\n",
    "그룹 오픈채팅방에서 동영상・압축파일 전송 시 전기통신사업법에 따라 방송통신심의위원회에서 불법촬영물등으로 심의・의결한 정보에 해당하는지를 비교・식별 후 전송을 제한하는 조치가 적용됩니다. 불법촬영물등을 전송할 경우 관련 법령에 따라 처벌받을 수 있사오니 서비스 이용 시 유의하여 주시기 바랍니다.\n",
    "성민상님이 들어왔습니다.\n",
    "[가나다] [오전 10:55] 안녕하세요\n",
    "[가나다] [오전 10:55] RAG관련해서 질문 해도될까요\n",
    "[가나다] [오전 10:57] 혹시 한국어에 유리한 임베딩 방법이 있을가요?\n",
    "[J] [오전 11:00] Bge m3 모델이 잘합니다\n",
    "[가나다] [오전 11:01] 오우 감사합니다 \n",
    "rag 입문인데\n",
    "[가나다] [오전 11:01] 경우의수가 너무 많네요\n",
    "[ABC] [오전 11:05] OPENAI 임베딩 쓰는 것보다 효과가 좋은 것인가요?\n",
    "[DEF] [오전 11:06] 온프레미스로 돌릴 목적이신가…\n",
    "[GHF] [오전 11:06] https://huggingface.co/BAAI/bge-m3\n",
    "[GHF] [오전 11:07] multilingual이라고 써있긴한대 한국어 임베딩 성능도 잘 나오려나요\n",
    "[1234] [오전 11:08] 현존하는 것 중에선 한국어 임베딩이 제일 좋은 것 같아요. 도메인 별로 다를 수도 있으니 직접 본인 데이터셋으로 해보셔서 테스트 해보세요\n",
    "[1234] [오전 11:26] bge m3 임베딩 전에 꼭 전처리 해야 할 팁이 있을까요? 그냥 문장 넣어도 의미적으로 잘 만드는 것일지..\n",
    "[J] [오전 11:26] 그냥 넣음됩니다 html 태그 같은건 빼는게 좋겠군요\n",
    "[가나다] [오전 11:29] 크 모두 감사합니다 \n",
];

const TABLE: &str = "Date,User,Message
2024-03-27 10:55:00,가나다,안녕하세요
2024-03-27 10:57:00,ABCDE,임베딩 질문입니다
2024-03-27 11:00:00,성민상,성민상님이 들어왔습니다.
2024-03-28 09:00:00,J,좋은 아침
";

fn transcript() -> String {
    TRANSCRIPT_LINES.join("\n")
}

fn write_temp(suffix: &str, bytes: &[u8]) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}

fn load(path: &Path, config: LoaderConfig) -> Result<Vec<MessageRecord>> {
    Loader::new(path, config)?.load()
}

// =========================================================================
// Transcript exports
// =========================================================================

#[test]
fn test_transcript_fixture_record_count() {
    let file = write_temp(".txt", transcript().as_bytes());
    let records = load(file.path(), LoaderConfig::default()).unwrap();

    assert_eq!(records.len(), 14);
}

#[test]
fn test_transcript_first_record() {
    let file = write_temp(".txt", transcript().as_bytes());
    let records = load(file.path(), LoaderConfig::default()).unwrap();

    let first = &records[0];
    assert_eq!(first.metadata().date, "2024-03-27 10:55:00");
    assert_eq!(first.text, "User: **, Message: 안녕하세요");
    assert_eq!(first.anonymized_user, "**");
    assert_eq!((first.year, first.month, first.day), (2024, 3, 27));
    assert_eq!(first.row_index, 0);
    assert_eq!(first.source, file.path().display().to_string());
}

#[test]
fn test_transcript_continuation_folded() {
    let file = write_temp(".txt", transcript().as_bytes());
    let records = load(file.path(), LoaderConfig::default()).unwrap();

    let folded = &records[4];
    assert_eq!(folded.text, "User: **, Message: 오우 감사합니다 rag 입문인데");
    assert_eq!(folded.metadata().date, "2024-03-27 11:01:00");

    // The next message-start is its own record
    assert_eq!(records[5].text, "User: **, Message: 경우의수가 너무 많네요");
}

#[test]
fn test_transcript_rows_in_encounter_order() {
    let file = write_temp(".txt", transcript().as_bytes());
    let records = load(file.path(), LoaderConfig::default()).unwrap();

    for (i, record) in records.iter().enumerate() {
        assert_eq!(record.row_index, i);
    }
    let times: Vec<_> = records.iter().map(|r| r.timestamp.naive()).collect();
    assert!(times.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_transcript_never_emits_notices() {
    let file = write_temp(".txt", transcript().as_bytes());
    let records = load(file.path(), LoaderConfig::default()).unwrap();

    assert!(
        records
            .iter()
            .all(|r| !r.text.contains("님이 들어왔습니다") && !r.text.contains("저장한 날짜"))
    );
}

#[test]
fn test_transcript_short_user_ids() {
    let file = write_temp(".txt", transcript().as_bytes());
    let records = load(file.path(), LoaderConfig::default()).unwrap();

    // "J" is fully masked to zero asterisks, "1234" keeps its last char
    assert_eq!(records[3].anonymized_user, "");
    assert_eq!(records[3].text, "User: , Message: Bge m3 모델이 잘합니다");
    assert_eq!(records[10].anonymized_user, "***4");
}

#[test]
fn test_transcript_mask_len_config() {
    let file = write_temp(".txt", transcript().as_bytes());
    let records = load(file.path(), LoaderConfig::new().with_mask_len(1)).unwrap();

    assert_eq!(records[0].anonymized_user, "*나다");
    assert_eq!(records[6].anonymized_user, "*BC");
}

#[test]
fn test_transcript_lazy_stream_is_fused() {
    let file = write_temp(".txt", transcript().as_bytes());
    let loader = Loader::new(file.path(), LoaderConfig::default()).unwrap();
    let mut stream = loader.lazy_load();

    assert_eq!(stream.state(), LoadState::Unstarted);
    assert!(stream.next().unwrap().is_ok());
    assert_eq!(stream.state(), LoadState::Reading);

    let rest = stream.by_ref().count();
    assert_eq!(rest, 13);
    assert_eq!(stream.state(), LoadState::Done);
    assert!(stream.next().is_none());
    assert!(stream.next().is_none());
}

#[test]
fn test_each_lazy_load_is_independent() {
    let file = write_temp(".txt", transcript().as_bytes());
    let loader = Loader::new(file.path(), LoaderConfig::default()).unwrap();

    let first: Vec<_> = loader.lazy_load().collect::<Result<_>>().unwrap();
    let second: Vec<_> = loader.lazy_load().collect::<Result<_>>().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_transcript_with_afternoon_and_midnight() {
    let content = "\
--------------- 2024년 4월 5일 금요일 ---------------
[Alice] [오전 12:05] 자정
[Alice] [오후 12:30] 정오
[Alice] [오후 11:59] 밤
";
    let file = write_temp(".txt", content.as_bytes());
    let records = load(file.path(), LoaderConfig::default()).unwrap();

    let dates: Vec<_> = records.iter().map(|r| r.metadata().date).collect();
    assert_eq!(
        dates,
        vec!["2024-04-05 00:05:00", "2024-04-05 12:30:00", "2024-04-05 23:59:00"]
    );
}

#[test]
fn test_transcript_across_days() {
    let content = "\
--------------- 2024년 12월 31일 화요일 ---------------
[Alice] [오후 11:58] 올해 마지막
--------------- 2025년 1월 1일 수요일 ---------------
[Bob] [오전 12:01] 새해 복
";
    let file = write_temp(".txt", content.as_bytes());
    let records = load(file.path(), LoaderConfig::default()).unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!((records[0].year, records[0].month, records[0].day), (2024, 12, 31));
    assert_eq!((records[1].year, records[1].month, records[1].day), (2025, 1, 1));
}

// =========================================================================
// Tabular exports
// =========================================================================

#[test]
fn test_csv_load() {
    let file = write_temp(".csv", TABLE.as_bytes());
    let records = load(file.path(), LoaderConfig::default()).unwrap();

    assert_eq!(records.len(), 4);
    assert_eq!(records[0].text, "User: **, Message: 안녕하세요");
    assert_eq!(records[1].anonymized_user, "***DE");
    assert_eq!(records[3].metadata().date, "2024-03-28 09:00:00");
}

#[test]
fn test_csv_relevance_filter() {
    let file = write_temp(".csv", TABLE.as_bytes());
    let records = load(file.path(), LoaderConfig::new().with_relevance_filter(true)).unwrap();

    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| !r.text.contains("님이 들어왔습니다")));
    // Row indexes stay contiguous over emitted records
    assert_eq!(
        records.iter().map(|r| r.row_index).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
}

#[test]
fn test_csv_with_bom() {
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice(TABLE.as_bytes());
    let file = write_temp(".csv", &bytes);

    let records = load(file.path(), LoaderConfig::default()).unwrap();
    assert_eq!(records.len(), 4);
}

#[test]
fn test_csv_bad_timestamp_reports_row() {
    let table = "Date,User,Message\n2024-03-27 10:55:00,가나다,ok\nnot a date,가나다,bad\n";
    let file = write_temp(".csv", table.as_bytes());

    let err = load(file.path(), LoaderConfig::default()).unwrap_err();
    assert!(err.is_load());
    match err.load_kind() {
        Some(LoadErrorKind::InvalidTimestamp { row, value }) => {
            assert_eq!(*row, 1);
            assert_eq!(value, "not a date");
        }
        other => panic!("unexpected error kind: {other:?}"),
    }
}

// =========================================================================
// Encodings
// =========================================================================

#[test]
fn test_cp949_transcript_with_declared_encoding() {
    let text = transcript();
    let (bytes, _, _) = encoding_rs::EUC_KR.encode(&text);
    let file = write_temp(".txt", &bytes);

    let records = load(file.path(), LoaderConfig::new().with_encoding("cp949")).unwrap();
    assert_eq!(records.len(), 14);
    assert_eq!(records[0].text, "User: **, Message: 안녕하세요");
}

#[test]
fn test_cp949_transcript_fails_without_autodetect() {
    let text = transcript();
    let (bytes, _, _) = encoding_rs::EUC_KR.encode(&text);
    let file = write_temp(".txt", &bytes);

    let err = load(file.path(), LoaderConfig::default()).unwrap_err();
    assert!(err.is_load());
    assert!(err.is_encoding());
}

#[test]
fn test_cp949_transcript_recovered_with_autodetect() {
    let text = transcript();
    let (bytes, _, _) = encoding_rs::EUC_KR.encode(&text);
    let file = write_temp(".txt", &bytes);

    let records = load(file.path(), LoaderConfig::autodetect()).unwrap();
    assert_eq!(records.len(), 14);
    assert_eq!(records[4].text, "User: **, Message: 오우 감사합니다 rag 입문인데");
}

#[test]
fn test_cp949_csv_recovered_with_autodetect() {
    let (bytes, _, _) = encoding_rs::EUC_KR.encode(TABLE);
    let file = write_temp(".csv", &bytes);

    let records = load(file.path(), LoaderConfig::autodetect()).unwrap();
    assert_eq!(records.len(), 4);
    assert_eq!(records[1].text, "User: ***DE, Message: 임베딩 질문입니다");
}

#[test]
fn test_unknown_encoding_label() {
    let file = write_temp(".txt", transcript().as_bytes());
    let err = load(file.path(), LoaderConfig::new().with_encoding("klingon")).unwrap_err();
    assert!(err.is_encoding());
}

// =========================================================================
// Loader façade
// =========================================================================

#[test]
fn test_missing_file_is_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.txt");

    let loader = Loader::new(&path, LoaderConfig::default()).unwrap();
    let mut stream = loader.lazy_load();

    let err = stream.next().unwrap().unwrap_err();
    assert!(err.is_load());
    assert!(err.is_io());
    assert_eq!(stream.state(), LoadState::Failed);
    assert!(stream.next().is_none());
}

#[test]
fn test_unknown_extension_rejected() {
    let err = Loader::new("chat.xlsx", LoaderConfig::default()).unwrap_err();
    assert!(err.is_invalid_format());
}

#[test]
fn test_explicit_kind_overrides_extension() {
    let file = write_temp(".log", TABLE.as_bytes());
    let loader = Loader::with_kind(file.path(), InputKind::Csv, LoaderConfig::default());

    assert_eq!(loader.load().unwrap().len(), 4);
}

#[test]
fn test_filtering_loaded_records() {
    let file = write_temp(".csv", TABLE.as_bytes());
    let records = load(file.path(), LoaderConfig::default()).unwrap();

    let filter = FilterConfig::new().with_date_from("2024-03-28").unwrap();
    let kept = apply_filters(records.clone(), &filter);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].anonymized_user, "");

    let by_user = apply_filters(records, &FilterConfig::new().with_user("***DE"));
    assert_eq!(by_user.len(), 1);
}
