use std::{fmt, io, str::FromStr};

use super::MAGIC;

const ALIGNMENT: usize = 64;

fn invalid_data<E>(e: E) -> io::Error
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    io::Error::new(io::ErrorKind::InvalidData, e)
}

#[derive(Clone, Debug, PartialEq)]
pub struct Header {
    pub version: Version,
    pub dict: HeaderDict,
}

impl Header {
    pub fn new(version: Version, dict: HeaderDict) -> Self {
        Self { version, dict }
    }

    pub fn read<R>(reader: &mut R) -> io::Result<Self>
    where
        R: io::BufRead,
    {
        let mut magic = [0; MAGIC.len()];
        reader.read_exact(&mut magic)?;
        if magic != MAGIC {
            return Err(invalid_data("missing npy magic number"));
        }

        let mut raw_version = [0; 2];
        reader.read_exact(&mut raw_version)?;
        let version = Version::try_from(raw_version)?;

        let header_len = match version {
            Version::V1 => {
                let mut buf = [0; 2];
                reader.read_exact(&mut buf)?;
                usize::from(u16::from_le_bytes(buf))
            }
            Version::V2 | Version::V3 => {
                let mut buf = [0; 4];
                reader.read_exact(&mut buf)?;
                u32::from_le_bytes(buf) as usize
            }
        };

        let mut buf = vec![0; header_len];
        reader.read_exact(&mut buf)?;
        let s = String::from_utf8(buf).map_err(invalid_data)?;

        let dict = HeaderDict::from_str(s.trim()).map_err(invalid_data)?;

        Ok(Self::new(version, dict))
    }

    pub fn write<W>(&self, writer: &mut W) -> io::Result<()>
    where
        W: io::Write,
    {
        let dict = self.dict.to_string();

        let prefix_len = MAGIC.len() + 2 + self.version.header_len_bytes();
        let unpadded_len = prefix_len + dict.len() + 1;
        let padding = (ALIGNMENT - unpadded_len % ALIGNMENT) % ALIGNMENT;
        let header_len = dict.len() + padding + 1;

        writer.write_all(&MAGIC)?;
        writer.write_all(&self.version.bytes())?;

        match self.version {
            Version::V1 => {
                let header_len = u16::try_from(header_len)
                    .map_err(|_| invalid_data("npy header too long for version 1"))?;
                writer.write_all(&header_len.to_le_bytes())?;
            }
            Version::V2 | Version::V3 => {
                let header_len = u32::try_from(header_len)
                    .map_err(|_| invalid_data("npy header too long"))?;
                writer.write_all(&header_len.to_le_bytes())?;
            }
        }

        writer.write_all(dict.as_bytes())?;
        writer.write_all(&vec![b' '; padding])?;
        writer.write_all(b"\n")
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Version {
    V1,
    V2,
    V3,
}

impl Version {
    fn bytes(&self) -> [u8; 2] {
        match self {
            Version::V1 => [1, 0],
            Version::V2 => [2, 0],
            Version::V3 => [3, 0],
        }
    }

    fn header_len_bytes(&self) -> usize {
        match self {
            Version::V1 => 2,
            Version::V2 | Version::V3 => 4,
        }
    }
}

impl TryFrom<[u8; 2]> for Version {
    type Error = io::Error;

    fn try_from(bytes: [u8; 2]) -> Result<Self, Self::Error> {
        match bytes {
            [1, 0] => Ok(Self::V1),
            [2, 0] => Ok(Self::V2),
            [3, 0] => Ok(Self::V3),
            [major, minor] => Err(invalid_data(format!(
                "unsupported npy version {major}.{minor}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HeaderDict {
    pub type_descriptor: TypeDescriptor,
    pub fortran_order: bool,
    pub shape: Vec<usize>,
}

impl HeaderDict {
    pub fn new(type_descriptor: TypeDescriptor, fortran_order: bool, shape: Vec<usize>) -> Self {
        Self {
            type_descriptor,
            fortran_order,
            shape,
        }
    }
}

/// Returns the remainder of the dict literal following the provided key and its colon.
fn value_of<'a>(s: &'a str, key: &str) -> Result<&'a str, ParseHeaderError> {
    ['\'', '"']
        .iter()
        .find_map(|quote| {
            let quoted = format!("{quote}{key}{quote}");
            s.find(&quoted).map(|i| &s[i + quoted.len()..])
        })
        .and_then(|rest| rest.trim_start().strip_prefix(':'))
        .map(str::trim_start)
        .ok_or_else(|| ParseHeaderError::missing_key(key))
}

impl FromStr for HeaderDict {
    type Err = ParseHeaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let descr = value_of(s, "descr")?;
        let type_descriptor = descr
            .strip_prefix(['\'', '"'])
            .and_then(|rest| rest.split_once(['\'', '"']))
            .ok_or_else(|| ParseHeaderError::invalid_value("descr"))
            .and_then(|(descr, _)| TypeDescriptor::from_str(descr))?;

        let fortran_order = value_of(s, "fortran_order")?;
        let fortran_order = if fortran_order.starts_with("True") {
            true
        } else if fortran_order.starts_with("False") {
            false
        } else {
            return Err(ParseHeaderError::invalid_value("fortran_order"));
        };

        let shape = value_of(s, "shape")?
            .strip_prefix('(')
            .and_then(|rest| rest.split_once(')'))
            .ok_or_else(|| ParseHeaderError::invalid_value("shape"))?
            .0
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(usize::from_str)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| ParseHeaderError::invalid_value("shape"))?;

        Ok(Self::new(type_descriptor, fortran_order, shape))
    }
}

impl fmt::Display for HeaderDict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fortran_order = if self.fortran_order { "True" } else { "False" };

        let shape = match self.shape.as_slice() {
            [n] => format!("({n},)"),
            shape => format!(
                "({})",
                shape
                    .iter()
                    .map(|n| n.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        };

        write!(
            f,
            "{{'descr': '{}', 'fortran_order': {fortran_order}, 'shape': {shape}, }}",
            self.type_descriptor
        )
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TypeDescriptor {
    pub endian: Endian,
    pub ty: Type,
}

impl TypeDescriptor {
    pub fn new(endian: Endian, ty: Type) -> Self {
        Self { endian, ty }
    }

    pub fn read<R>(&self, reader: &mut R) -> io::Result<Vec<f64>>
    where
        R: io::Read,
    {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;

        let width = self.ty.width();
        if buf.len() % width != 0 {
            return Err(invalid_data(
                "npy data length not a multiple of the type width",
            ));
        }

        Ok(buf
            .chunks_exact(width)
            .map(|bytes| self.ty.to_f64(bytes, self.endian))
            .collect())
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let endian = match self.endian {
            Endian::Little => '<',
            Endian::Big => '>',
            Endian::NotApplicable => '|',
        };

        write!(f, "{endian}{}", self.ty.as_str())
    }
}

impl FromStr for TypeDescriptor {
    type Err = ParseHeaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();

        let endian = match chars.next() {
            // Native byte order is assumed to be little-endian
            Some('<') | Some('=') => Endian::Little,
            Some('>') => Endian::Big,
            Some('|') => Endian::NotApplicable,
            _ => return Err(ParseHeaderError::UnsupportedType(s.to_string())),
        };

        let ty = match chars.as_str() {
            "i1" => Type::I1,
            "i2" => Type::I2,
            "i4" => Type::I4,
            "i8" => Type::I8,
            "u1" => Type::U1,
            "u2" => Type::U2,
            "u4" => Type::U4,
            "u8" => Type::U8,
            "f4" => Type::F4,
            "f8" => Type::F8,
            _ => return Err(ParseHeaderError::UnsupportedType(s.to_string())),
        };

        Ok(Self::new(endian, ty))
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Endian {
    Little,
    Big,
    NotApplicable,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Type {
    I1,
    I2,
    I4,
    I8,
    U1,
    U2,
    U4,
    U8,
    F4,
    F8,
}

macro_rules! from_bytes {
    ($ty:ty, $bytes:expr, $endian:expr) => {{
        let mut buf = [0; std::mem::size_of::<$ty>()];
        buf.copy_from_slice($bytes);
        match $endian {
            Endian::Big => <$ty>::from_be_bytes(buf),
            Endian::Little | Endian::NotApplicable => <$ty>::from_le_bytes(buf),
        }
    }};
}

impl Type {
    fn as_str(&self) -> &'static str {
        match self {
            Type::I1 => "i1",
            Type::I2 => "i2",
            Type::I4 => "i4",
            Type::I8 => "i8",
            Type::U1 => "u1",
            Type::U2 => "u2",
            Type::U4 => "u4",
            Type::U8 => "u8",
            Type::F4 => "f4",
            Type::F8 => "f8",
        }
    }

    fn width(&self) -> usize {
        match self {
            Type::I1 | Type::U1 => 1,
            Type::I2 | Type::U2 => 2,
            Type::I4 | Type::U4 | Type::F4 => 4,
            Type::I8 | Type::U8 | Type::F8 => 8,
        }
    }

    fn to_f64(self, bytes: &[u8], endian: Endian) -> f64 {
        match self {
            Type::I1 => from_bytes!(i8, bytes, endian) as f64,
            Type::I2 => from_bytes!(i16, bytes, endian) as f64,
            Type::I4 => from_bytes!(i32, bytes, endian) as f64,
            Type::I8 => from_bytes!(i64, bytes, endian) as f64,
            Type::U1 => from_bytes!(u8, bytes, endian) as f64,
            Type::U2 => from_bytes!(u16, bytes, endian) as f64,
            Type::U4 => from_bytes!(u32, bytes, endian) as f64,
            Type::U8 => from_bytes!(u64, bytes, endian) as f64,
            Type::F4 => from_bytes!(f32, bytes, endian) as f64,
            Type::F8 => from_bytes!(f64, bytes, endian),
        }
    }
}

#[derive(Debug, Eq, PartialEq)]
pub enum ParseHeaderError {
    MissingKey(String),
    InvalidValue(String),
    UnsupportedType(String),
}

impl ParseHeaderError {
    fn missing_key(key: &str) -> Self {
        Self::MissingKey(key.to_string())
    }

    fn invalid_value(key: &str) -> Self {
        Self::InvalidValue(key.to_string())
    }
}

impl fmt::Display for ParseHeaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseHeaderError::MissingKey(key) => write!(f, "npy header missing key '{key}'"),
            ParseHeaderError::InvalidValue(key) => {
                write!(f, "invalid value for key '{key}' in npy header")
            }
            ParseHeaderError::UnsupportedType(descr) => {
                write!(f, "unsupported npy type descriptor '{descr}'")
            }
        }
    }
}

impl std::error::Error for ParseHeaderError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header_dict() {
        let s = "{'descr': '<f8', 'fortran_order': False, 'shape': (3, 5), }";

        assert_eq!(
            HeaderDict::from_str(s),
            Ok(HeaderDict::new(
                TypeDescriptor::new(Endian::Little, Type::F8),
                false,
                vec![3, 5]
            ))
        );
    }

    #[test]
    fn test_parse_header_dict_1d_big_endian_int() {
        let s = "{'descr': '>i4', 'fortran_order': False, 'shape': (7,), }";

        assert_eq!(
            HeaderDict::from_str(s),
            Ok(HeaderDict::new(
                TypeDescriptor::new(Endian::Big, Type::I4),
                false,
                vec![7]
            ))
        );
    }

    #[test]
    fn test_parse_header_dict_missing_shape() {
        let s = "{'descr': '<f8', 'fortran_order': False, }";

        assert_eq!(
            HeaderDict::from_str(s),
            Err(ParseHeaderError::MissingKey(String::from("shape")))
        );
    }

    #[test]
    fn test_display_header_dict() {
        let dict = HeaderDict::new(
            TypeDescriptor::new(Endian::Little, Type::F8),
            false,
            vec![11],
        );

        assert_eq!(
            dict.to_string(),
            "{'descr': '<f8', 'fortran_order': False, 'shape': (11,), }"
        );
    }

    #[test]
    fn test_read_big_endian_values() -> io::Result<()> {
        let descr = TypeDescriptor::new(Endian::Big, Type::U2);
        let src = [0u8, 1, 1, 0];

        assert_eq!(descr.read(&mut &src[..])?, vec![1., 256.]);

        Ok(())
    }

    #[test]
    fn test_read_little_endian_f4_values() -> io::Result<()> {
        let descr = TypeDescriptor::new(Endian::Little, Type::F4);
        let src = [0.1f32, -2.5]
            .iter()
            .flat_map(|x| x.to_le_bytes())
            .collect::<Vec<_>>();

        assert_approx_eq!(descr.read(&mut &src[..])?, vec![0.1, -2.5], epsilon = 1e-6);

        Ok(())
    }

    #[test]
    fn test_read_unsupported_version() {
        let mut src = MAGIC.to_vec();
        src.extend([9, 0, 0, 0]);

        assert!(Header::read(&mut &src[..]).is_err());
    }
}
