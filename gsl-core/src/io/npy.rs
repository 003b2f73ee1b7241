//! # NPY - Leitura e escrita de arrays NumPy
//!
//! Suporta as versões 1.0, 2.0 e 3.0 do formato, dtypes numéricos simples
//! (`f4 f8 i1 i2 i4 i8 u1 u2 u4 u8 b1`) e dtypes estruturados compostos por
//! eles (campos `V` são tratados como padding). Todos os valores são
//! decodificados para `f64`.
//!
//! ## Layout do arquivo
//!
//! | Offset | Conteúdo |
//! |:-------|:---------|
//! | 0 | `\x93NUMPY` |
//! | 6 | versão (major, minor) |
//! | 8 | tamanho do header (u16 LE na v1, u32 LE na v2/v3) |
//! | 10 / 12 | header: literal de dict Python, terminado em `\n` |
//! | … | payload em ordem C |
//!
//! Arquivos acima de 64 KiB são mapeados em memória.

use bytes::{Buf, BufMut, BytesMut};
use memmap2::MmapOptions;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::trace;

/// String mágica de todo arquivo `.npy`
pub const MAGIC: &[u8; 6] = b"\x93NUMPY";

/// Acima deste tamanho o arquivo é mapeado em memória
const MMAP_THRESHOLD: u64 = 65536;

/// Alinhamento do header exigido pelo formato
const HEADER_ALIGN: usize = 64;

pub type NpyResult<T> = Result<T, NpyError>;

/// Erros do codec NPY
#[derive(Debug, Error)]
pub enum NpyError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Not an NPY file: bad magic string")]
    BadMagic,

    #[error("Unsupported NPY format version {0}.{1}")]
    UnsupportedVersion(u8, u8),

    #[error("Malformed NPY header: {0}")]
    Header(String),

    #[error("Unsupported dtype: {0}")]
    UnsupportedDtype(String),

    #[error("Fortran-ordered arrays are not supported (shape {0:?})")]
    FortranOrder(Vec<usize>),

    #[error("Truncated NPY payload: expected {expected} bytes, found {found}")]
    Truncated { expected: usize, found: usize },

    #[error("Field not found: {0}")]
    MissingField(String),

    #[error("Array is structured; read it through a field")]
    Structured,

    #[error("Array is not structured")]
    NotStructured,

    #[error("Shape {shape:?} does not match {len} values")]
    ShapeMismatch { shape: Vec<usize>, len: usize },
}

// ═══════════════════════════════════════════════════════════════════════════════
// DTYPES
// ═══════════════════════════════════════════════════════════════════════════════

/// Ordem dos bytes de um escalar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Little,
    Big,
}

/// Categoria de um escalar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Float,
    Int,
    UInt,
    Bool,
    /// Bytes opacos (padding em dtypes estruturados)
    Void,
}

/// Descritor de um escalar (`'<f8'`, `'|u1'`, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scalar {
    pub kind: ScalarKind,
    pub size: usize,
    pub order: ByteOrder,
}

impl Scalar {
    /// `float64` little-endian, o dtype usado na escrita
    pub const F8: Scalar = Scalar {
        kind: ScalarKind::Float,
        size: 8,
        order: ByteOrder::Little,
    };

    /// Interpreta uma string de descr do NumPy
    pub fn parse(descr: &str) -> NpyResult<Self> {
        let unsupported = || NpyError::UnsupportedDtype(descr.to_string());

        let mut chars = descr.chars();
        let (order, rest) = match chars.next() {
            Some('<') | Some('=') | Some('|') => (ByteOrder::Little, chars.as_str()),
            Some('>') => (ByteOrder::Big, chars.as_str()),
            Some(_) => (ByteOrder::Little, descr),
            None => return Err(unsupported()),
        };

        let mut rest_chars = rest.chars();
        let kind = match rest_chars.next() {
            Some('f') => ScalarKind::Float,
            Some('i') => ScalarKind::Int,
            Some('u') => ScalarKind::UInt,
            Some('b') => ScalarKind::Bool,
            Some('V') => ScalarKind::Void,
            _ => return Err(unsupported()),
        };
        let size: usize = rest_chars.as_str().parse().map_err(|_| unsupported())?;

        let valid = match kind {
            ScalarKind::Float => matches!(size, 4 | 8),
            ScalarKind::Int | ScalarKind::UInt => matches!(size, 1 | 2 | 4 | 8),
            ScalarKind::Bool => size == 1,
            ScalarKind::Void => size > 0,
        };
        if !valid {
            return Err(unsupported());
        }

        Ok(Self { kind, size, order })
    }

    /// String de descr equivalente
    pub fn descr(&self) -> String {
        let order = match (self.size, self.order) {
            (1, _) => '|',
            (_, ByteOrder::Little) => '<',
            (_, ByteOrder::Big) => '>',
        };
        let kind = match self.kind {
            ScalarKind::Float => 'f',
            ScalarKind::Int => 'i',
            ScalarKind::UInt => 'u',
            ScalarKind::Bool => 'b',
            ScalarKind::Void => 'V',
        };
        format!("{order}{kind}{}", self.size)
    }

    /// Decodifica um valor do início de `buf`, avançando `size` bytes
    fn read(&self, buf: &mut &[u8]) -> f64 {
        let big = self.order == ByteOrder::Big;
        match (self.kind, self.size) {
            (ScalarKind::Float, 4) => (if big { buf.get_f32() } else { buf.get_f32_le() }) as f64,
            (ScalarKind::Float, _) => if big { buf.get_f64() } else { buf.get_f64_le() },
            (ScalarKind::Int, 1) => buf.get_i8() as f64,
            (ScalarKind::Int, 2) => (if big { buf.get_i16() } else { buf.get_i16_le() }) as f64,
            (ScalarKind::Int, 4) => (if big { buf.get_i32() } else { buf.get_i32_le() }) as f64,
            (ScalarKind::Int, _) => (if big { buf.get_i64() } else { buf.get_i64_le() }) as f64,
            (ScalarKind::UInt, 1) => buf.get_u8() as f64,
            (ScalarKind::UInt, 2) => (if big { buf.get_u16() } else { buf.get_u16_le() }) as f64,
            (ScalarKind::UInt, 4) => (if big { buf.get_u32() } else { buf.get_u32_le() }) as f64,
            (ScalarKind::UInt, _) => (if big { buf.get_u64() } else { buf.get_u64_le() }) as f64,
            (ScalarKind::Bool, _) => {
                if buf.get_u8() != 0 {
                    1.0
                } else {
                    0.0
                }
            }
            (ScalarKind::Void, n) => {
                buf.advance(n);
                0.0
            }
        }
    }
}

/// Campo de um dtype estruturado
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub scalar: Scalar,
}

/// Dtype de um array: escalar ou registro
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DType {
    Scalar(Scalar),
    Record(Vec<Field>),
}

impl DType {
    /// Tamanho de um item em bytes
    pub fn item_size(&self) -> usize {
        match self {
            DType::Scalar(s) => s.size,
            DType::Record(fields) => fields.iter().map(|f| f.scalar.size).sum(),
        }
    }

    fn from_literal(lit: &Literal) -> NpyResult<Self> {
        match lit {
            Literal::Str(s) => {
                let scalar = Scalar::parse(s)?;
                if scalar.kind == ScalarKind::Void {
                    return Err(NpyError::UnsupportedDtype(s.clone()));
                }
                Ok(DType::Scalar(scalar))
            }
            Literal::List(items) => {
                let mut fields = Vec::with_capacity(items.len());
                for item in items {
                    let parts = match item {
                        Literal::Tuple(parts) => parts,
                        other => {
                            return Err(NpyError::UnsupportedDtype(format!("{other:?}")));
                        }
                    };
                    match parts.as_slice() {
                        [Literal::Str(name), Literal::Str(descr)] => fields.push(Field {
                            name: name.clone(),
                            scalar: Scalar::parse(descr)?,
                        }),
                        _ => return Err(NpyError::UnsupportedDtype(format!("{parts:?}"))),
                    }
                }
                Ok(DType::Record(fields))
            }
            other => Err(NpyError::UnsupportedDtype(format!("{other:?}"))),
        }
    }

    fn to_literal(&self) -> String {
        match self {
            DType::Scalar(s) => format!("'{}'", s.descr()),
            DType::Record(fields) => {
                let parts: Vec<String> = fields
                    .iter()
                    .map(|f| format!("('{}', '{}')", f.name, f.scalar.descr()))
                    .collect();
                format!("[{}]", parts.join(", "))
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ARRAY
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
enum NpyData {
    Values(Vec<f64>),
    Records(Vec<(String, Vec<f64>)>),
}

/// Array NumPy decodificado para `f64`
#[derive(Debug, Clone, PartialEq)]
pub struct NpyArray {
    shape: Vec<usize>,
    dtype: DType,
    data: NpyData,
}

impl NpyArray {
    /// Abre e decodifica um arquivo `.npy`
    pub fn open<P: AsRef<Path>>(path: P) -> NpyResult<Self> {
        let path = path.as_ref();
        let io_err = |source| NpyError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut file = File::open(path).map_err(io_err)?;
        let len = file.metadata().map_err(io_err)?.len();
        trace!(path = %path.display(), bytes = len, mapped = len > MMAP_THRESHOLD, "Reading NPY file");

        if len > MMAP_THRESHOLD {
            let mmap = unsafe { MmapOptions::new().map(&file).map_err(io_err)? };
            Self::parse(&mmap)
        } else {
            let mut buf = BytesMut::zeroed(len as usize);
            file.read_exact(&mut buf).map_err(io_err)?;
            Self::parse(&buf)
        }
    }

    /// Decodifica um arquivo `.npy` completo em memória
    pub fn parse(bytes: &[u8]) -> NpyResult<Self> {
        if bytes.len() < 10 || &bytes[..6] != MAGIC {
            return Err(NpyError::BadMagic);
        }

        let mut buf = &bytes[6..];
        let major = buf.get_u8();
        let minor = buf.get_u8();
        let header_len = match major {
            1 => buf.get_u16_le() as usize,
            2 | 3 if buf.remaining() >= 4 => buf.get_u32_le() as usize,
            _ => return Err(NpyError::UnsupportedVersion(major, minor)),
        };

        if buf.remaining() < header_len {
            return Err(NpyError::Truncated {
                expected: header_len,
                found: buf.remaining(),
            });
        }
        let header = std::str::from_utf8(&buf[..header_len])
            .map_err(|e| NpyError::Header(e.to_string()))?;
        buf.advance(header_len);

        let (dtype, fortran_order, shape) = parse_header(header)?;
        if fortran_order && shape.len() > 1 {
            return Err(NpyError::FortranOrder(shape));
        }

        let count = element_count(&shape)
            .ok_or_else(|| NpyError::Header(format!("shape {shape:?} overflows the address space")))?;
        let expected = count
            .checked_mul(dtype.item_size())
            .ok_or_else(|| NpyError::Header(format!("payload of shape {shape:?} overflows the address space")))?;
        if buf.remaining() < expected {
            return Err(NpyError::Truncated {
                expected,
                found: buf.remaining(),
            });
        }

        let data = match &dtype {
            DType::Scalar(scalar) => {
                let mut values = Vec::with_capacity(count);
                for _ in 0..count {
                    values.push(scalar.read(&mut buf));
                }
                NpyData::Values(values)
            }
            DType::Record(fields) => {
                let mut columns: Vec<(String, Vec<f64>)> = fields
                    .iter()
                    .filter(|f| f.scalar.kind != ScalarKind::Void)
                    .map(|f| (f.name.clone(), Vec::with_capacity(count)))
                    .collect();
                for _ in 0..count {
                    let mut slots = columns.iter_mut();
                    for field in fields {
                        let value = field.scalar.read(&mut buf);
                        if field.scalar.kind == ScalarKind::Void {
                            continue;
                        }
                        if let Some((_, column)) = slots.next() {
                            column.push(value);
                        }
                    }
                }
                NpyData::Records(columns)
            }
        };

        Ok(Self { shape, dtype, data })
    }

    /// Array `float64` com a forma dada
    pub fn from_values(shape: Vec<usize>, values: Vec<f64>) -> NpyResult<Self> {
        if element_count(&shape) != Some(values.len()) {
            return Err(NpyError::ShapeMismatch {
                shape,
                len: values.len(),
            });
        }
        Ok(Self {
            shape,
            dtype: DType::Scalar(Scalar::F8),
            data: NpyData::Values(values),
        })
    }

    /// Array estruturado 1-D com campos `float64`, uma coluna por campo
    pub fn from_records(columns: Vec<(String, Vec<f64>)>) -> NpyResult<Self> {
        let count = columns.first().map(|(_, c)| c.len()).unwrap_or(0);
        if let Some((_, bad)) = columns.iter().find(|(_, c)| c.len() != count) {
            return Err(NpyError::ShapeMismatch {
                shape: vec![count],
                len: bad.len(),
            });
        }
        let fields = columns
            .iter()
            .map(|(name, _)| Field {
                name: name.clone(),
                scalar: Scalar::F8,
            })
            .collect();
        Ok(Self {
            shape: vec![count],
            dtype: DType::Record(fields),
            data: NpyData::Records(columns),
        })
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn dtype(&self) -> &DType {
        &self.dtype
    }

    /// Número de itens
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_structured(&self) -> bool {
        matches!(self.data, NpyData::Records(_))
    }

    /// Valores em ordem C (apenas arrays não estruturados)
    pub fn values(&self) -> NpyResult<&[f64]> {
        match &self.data {
            NpyData::Values(v) => Ok(v),
            NpyData::Records(_) => Err(NpyError::Structured),
        }
    }

    /// Coluna de um campo (apenas arrays estruturados)
    pub fn field(&self, name: &str) -> NpyResult<&[f64]> {
        match &self.data {
            NpyData::Records(columns) => columns
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, c)| c.as_slice())
                .ok_or_else(|| NpyError::MissingField(name.to_string())),
            NpyData::Values(_) => Err(NpyError::NotStructured),
        }
    }

    /// Nomes dos campos (vazio para arrays não estruturados)
    pub fn field_names(&self) -> Vec<&str> {
        match &self.data {
            NpyData::Records(columns) => columns.iter().map(|(n, _)| n.as_str()).collect(),
            NpyData::Values(_) => Vec::new(),
        }
    }

    /// Serializa sempre em `float64` little-endian, no formato 1.0 ou 2.0
    /// quando o header não cabe em 16 bits
    pub fn to_bytes(&self) -> Vec<u8> {
        let dtype = match &self.dtype {
            DType::Scalar(_) => DType::Scalar(Scalar::F8),
            DType::Record(fields) => DType::Record(
                fields
                    .iter()
                    .filter(|f| f.scalar.kind != ScalarKind::Void)
                    .map(|f| Field {
                        name: f.name.clone(),
                        scalar: Scalar::F8,
                    })
                    .collect(),
            ),
        };

        let dict = format!(
            "{{'descr': {}, 'fortran_order': False, 'shape': {}, }}",
            dtype.to_literal(),
            shape_literal(&self.shape)
        );
        let v1 = padded_header(&dict, MAGIC.len() + 4);
        let (major, header) = if v1.len() <= u16::MAX as usize {
            (1, v1)
        } else {
            (2, padded_header(&dict, MAGIC.len() + 6))
        };

        let mut out = BytesMut::with_capacity(MAGIC.len() + 6 + header.len() + self.len() * dtype.item_size());
        out.put_slice(MAGIC);
        out.put_u8(major);
        out.put_u8(0);
        if major == 1 {
            out.put_u16_le(header.len() as u16);
        } else {
            out.put_u32_le(header.len() as u32);
        }
        out.put_slice(header.as_bytes());

        match &self.data {
            NpyData::Values(values) => {
                for v in values {
                    out.put_f64_le(*v);
                }
            }
            NpyData::Records(columns) => {
                let count = columns.first().map(|(_, c)| c.len()).unwrap_or(0);
                for i in 0..count {
                    for (_, column) in columns {
                        out.put_f64_le(column[i]);
                    }
                }
            }
        }

        out.to_vec()
    }

    /// Escreve o array em `path`
    pub fn write<P: AsRef<Path>>(&self, path: P) -> NpyResult<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_bytes()).map_err(|source| NpyError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Produto das dimensões, `None` em overflow
fn element_count(shape: &[usize]) -> Option<usize> {
    shape.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d))
}

/// Completa o dict com espaços e `\n` até alinhar `preamble + header`
fn padded_header(dict: &str, preamble: usize) -> String {
    let unpadded = preamble + dict.len() + 1;
    let padding = (HEADER_ALIGN - unpadded % HEADER_ALIGN) % HEADER_ALIGN;
    let mut header = String::with_capacity(dict.len() + padding + 1);
    header.push_str(dict);
    header.extend(std::iter::repeat_n(' ', padding));
    header.push('\n');
    header
}

fn shape_literal(shape: &[usize]) -> String {
    match shape {
        [] => "()".to_string(),
        [n] => format!("({n},)"),
        dims => {
            let parts: Vec<String> = dims.iter().map(|d| d.to_string()).collect();
            format!("({})", parts.join(", "))
        }
    }
}

fn parse_header(header: &str) -> NpyResult<(DType, bool, Vec<usize>)> {
    let literal = LiteralParser::new(header).parse_document()?;
    let entries = match literal {
        Literal::Dict(entries) => entries,
        other => return Err(NpyError::Header(format!("expected dict, found {other:?}"))),
    };

    let lookup = |key: &str| {
        entries
            .iter()
            .find(|(k, _)| matches!(k, Literal::Str(s) if s == key))
            .map(|(_, v)| v)
            .ok_or_else(|| NpyError::Header(format!("missing key '{key}'")))
    };

    let dtype = DType::from_literal(lookup("descr")?)?;

    let fortran_order = match lookup("fortran_order")? {
        Literal::Bool(b) => *b,
        other => return Err(NpyError::Header(format!("fortran_order must be a bool, found {other:?}"))),
    };

    let shape = match lookup("shape")? {
        Literal::Tuple(dims) => dims
            .iter()
            .map(|d| match d {
                Literal::Int(n) if *n >= 0 => Ok(*n as usize),
                other => Err(NpyError::Header(format!("invalid dimension {other:?}"))),
            })
            .collect::<NpyResult<Vec<usize>>>()?,
        other => return Err(NpyError::Header(format!("shape must be a tuple, found {other:?}"))),
    };

    Ok((dtype, fortran_order, shape))
}

// ═══════════════════════════════════════════════════════════════════════════════
// LITERAIS PYTHON DO HEADER
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
enum Literal {
    Str(String),
    Int(i64),
    Bool(bool),
    None,
    Tuple(Vec<Literal>),
    List(Vec<Literal>),
    Dict(Vec<(Literal, Literal)>),
}

/// Parser recursivo para o subconjunto de literais usado pelo header NPY
struct LiteralParser<'a> {
    src: &'a [u8],
    pos: usize,
}

impl<'a> LiteralParser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src: src.as_bytes(),
            pos: 0,
        }
    }

    fn error(&self, msg: &str) -> NpyError {
        NpyError::Header(format!("{msg} at offset {}", self.pos))
    }

    fn skip_ws(&mut self) {
        while self.pos < self.src.len() && self.src[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn peek(&mut self) -> Option<u8> {
        self.skip_ws();
        self.src.get(self.pos).copied()
    }

    fn expect(&mut self, byte: u8) -> NpyResult<()> {
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(&format!("expected '{}'", byte as char)))
        }
    }

    fn parse_document(&mut self) -> NpyResult<Literal> {
        let value = self.parse_value()?;
        if self.peek().is_some() {
            return Err(self.error("trailing characters"));
        }
        Ok(value)
    }

    fn parse_value(&mut self) -> NpyResult<Literal> {
        match self.peek() {
            Some(b'{') => self.parse_dict(),
            Some(b'(') => self.parse_sequence(b'(', b')').map(Literal::Tuple),
            Some(b'[') => self.parse_sequence(b'[', b']').map(Literal::List),
            Some(q @ (b'\'' | b'"')) => self.parse_string(q),
            Some(b'-' | b'0'..=b'9') => self.parse_int(),
            Some(c) if c.is_ascii_alphabetic() => self.parse_word(),
            Some(_) => Err(self.error("unexpected character")),
            None => Err(self.error("unexpected end of header")),
        }
    }

    fn parse_dict(&mut self) -> NpyResult<Literal> {
        self.expect(b'{')?;
        let mut entries = Vec::new();
        loop {
            if self.peek() == Some(b'}') {
                self.pos += 1;
                return Ok(Literal::Dict(entries));
            }
            let key = self.parse_value()?;
            self.expect(b':')?;
            let value = self.parse_value()?;
            entries.push((key, value));
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b'}') => {}
                _ => return Err(self.error("expected ',' or '}'")),
            }
        }
    }

    fn parse_sequence(&mut self, open: u8, close: u8) -> NpyResult<Vec<Literal>> {
        self.expect(open)?;
        let mut items = Vec::new();
        loop {
            if self.peek() == Some(close) {
                self.pos += 1;
                return Ok(items);
            }
            items.push(self.parse_value()?);
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(c) if c == close => {}
                _ => return Err(self.error("expected ',' or closing bracket")),
            }
        }
    }

    fn parse_string(&mut self, quote: u8) -> NpyResult<Literal> {
        self.expect(quote)?;
        let start = self.pos;
        while self.pos < self.src.len() && self.src[self.pos] != quote {
            self.pos += 1;
        }
        if self.pos >= self.src.len() {
            return Err(self.error("unterminated string"));
        }
        let text = String::from_utf8_lossy(&self.src[start..self.pos]).into_owned();
        self.pos += 1;
        Ok(Literal::Str(text))
    }

    fn parse_int(&mut self) -> NpyResult<Literal> {
        self.skip_ws();
        let start = self.pos;
        if self.src.get(self.pos) == Some(&b'-') {
            self.pos += 1;
        }
        while self.pos < self.src.len() && self.src[self.pos].is_ascii_digit() {
            self.pos += 1;
        }
        // Python 2 escrevia dimensões como `3L`
        let end = self.pos;
        if self.src.get(self.pos) == Some(&b'L') {
            self.pos += 1;
        }
        std::str::from_utf8(&self.src[start..end])
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Literal::Int)
            .ok_or_else(|| self.error("invalid integer"))
    }

    fn parse_word(&mut self) -> NpyResult<Literal> {
        self.skip_ws();
        let start = self.pos;
        while self.pos < self.src.len() && self.src[self.pos].is_ascii_alphanumeric() {
            self.pos += 1;
        }
        match &self.src[start..self.pos] {
            b"True" => Ok(Literal::Bool(true)),
            b"False" => Ok(Literal::Bool(false)),
            b"None" => Ok(Literal::None),
            _ => Err(self.error("unknown identifier")),
        }
    }
}
