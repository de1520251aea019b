/// Header spellings accepted for the company legal name, tried in order.
pub const LEGAL_NAME_HEADERS: &[&str] = &[
    "Razão Social",
    "razao_social",
    "RAZAO_SOCIAL",
    "Razao Social",
    "razaoSocial",
    "nome",
    "Nome",
    "NOME",
];

/// Header spellings accepted for the CNPJ column, tried in order.
pub const IDENTIFIER_HEADERS: &[&str] = &["CNPJ", "cnpj", "Cnpj"];

/// Number of digits in a well-formed CNPJ.
pub const CNPJ_DIGITS: usize = 14;

// File extensions (lower-case) understood by the format dispatcher
pub const CSV_EXTENSION: &str = "csv";
pub const XLSX_EXTENSION: &str = "xlsx";
pub const XLS_EXTENSION: &str = "xls";

/// Query parameter carrying the cleaned CNPJ in reference links
pub const REFERENCE_QUERY_PARAM: &str = "cnpj";

/// Public CNPJ lookup page used when no reference base is configured
pub const DEFAULT_REFERENCE_URL_BASE: &str =
    "https://solucoes.receita.fazenda.gov.br/Servicos/cnpjreva/Cnpjreva_Solicitacao.asp";

/// Multipart field carrying the uploaded spreadsheet
pub const UPLOAD_FIELD: &str = "planilha";

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
