//! Field validators for Brazilian registry numbers and client codes.
//!
//! The `is_valid_*` predicates are pure and total. The `validate_*`
//! wrappers adapt them to `validator`'s custom-function signature so they
//! can be declared on request fields; the message key is supplied by the
//! field declaration.

use validator::ValidationError;

use super::types::ClienteStatus;

/// Returns `true` for an 11-digit CPF whose two check digits are correct.
///
/// Sequences of one repeated digit pass the checksum arithmetic but are
/// never issued, so they are rejected.
pub fn is_valid_cpf(cpf: &str) -> bool {
    let Some(digits) = ascii_digits::<11>(cpf) else {
        return false;
    };
    if all_same(&digits) {
        return false;
    }

    let first = check_digit(&digits[..9], &[10, 9, 8, 7, 6, 5, 4, 3, 2]);
    let second = check_digit(&digits[..10], &[11, 10, 9, 8, 7, 6, 5, 4, 3, 2]);
    digits[9] == first && digits[10] == second
}

/// Returns `true` for a 14-digit CNPJ whose two check digits are correct.
pub fn is_valid_cnpj(cnpj: &str) -> bool {
    let Some(digits) = ascii_digits::<14>(cnpj) else {
        return false;
    };
    if all_same(&digits) {
        return false;
    }

    let first = check_digit(&digits[..12], &[5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2]);
    let second = check_digit(&digits[..13], &[6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2]);
    digits[12] == first && digits[13] == second
}

/// Returns `true` for `NNNNNNNN` or `NNNNN-NNN`.
pub fn is_valid_cep(cep: &str) -> bool {
    let bytes = cep.as_bytes();
    match bytes.len() {
        8 => bytes.iter().all(u8::is_ascii_digit),
        9 => {
            bytes[5] == b'-'
                && bytes[..5].iter().all(u8::is_ascii_digit)
                && bytes[6..].iter().all(u8::is_ascii_digit)
        }
        _ => false,
    }
}

/// Returns `true` when the code names a known client status.
pub fn is_valid_cliente_status(code: &str) -> bool {
    code.parse::<ClienteStatus>().is_ok()
}

/// CPF field constraint. An empty value is left to the `required` rule.
pub fn validate_cpf(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || is_valid_cpf(value) {
        Ok(())
    } else {
        Err(ValidationError::new("cpf"))
    }
}

/// CNPJ field constraint. An empty value is left to the `required` rule.
pub fn validate_cnpj(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || is_valid_cnpj(value) {
        Ok(())
    } else {
        Err(ValidationError::new("cnpj"))
    }
}

pub fn validate_cep(value: &str) -> Result<(), ValidationError> {
    if is_valid_cep(value) {
        Ok(())
    } else {
        Err(ValidationError::new("cep"))
    }
}

pub fn validate_cliente_status(value: &str) -> Result<(), ValidationError> {
    if is_valid_cliente_status(value) {
        Ok(())
    } else {
        Err(ValidationError::new("cliente_status"))
    }
}

/// Message for a value that cannot be read as the field's type
pub const BODY_MESSAGE_KEY: &str = "requisicao.valor.invalido";

/// Every message key a field constraint can report.
///
/// Checked against the message catalog at startup.
pub const FIELD_MESSAGE_KEYS: &[&str] = &[
    BODY_MESSAGE_KEY,
    "banco.numero.obrigatorio",
    "banco.numero.invalido",
    "banco.cnpj.obrigatorio",
    "banco.cnpj.invalido",
    "banco.nome.obrigatorio",
    "banco.nome.tamanho",
    "cliente.nome.obrigatorio",
    "cliente.nome.tamanho",
    "cliente.status.obrigatorio",
    "cliente.status.invalido",
    "cliente_pessoa_fisica.rg.obrigatorio",
    "cliente_pessoa_fisica.rg.tamanho",
    "cliente_pessoa_fisica.cpf.obrigatorio",
    "cliente_pessoa_fisica.cpf.invalido",
    "cliente_pessoa_juridica.cnpj.obrigatorio",
    "cliente_pessoa_juridica.cnpj.invalido",
    "endereco.logradouro.obrigatorio",
    "endereco.numero.obrigatorio",
    "endereco.bairro.obrigatorio",
    "endereco.cep.obrigatorio",
    "endereco.cep.invalido",
    "endereco.cidade.obrigatorio",
    "endereco.estado.obrigatorio",
    "endereco.estado.invalido",
    "conta.numero.obrigatorio",
    "conta.numero.invalido",
    "conta.banco.obrigatorio",
    "conta.saldo.obrigatorio",
];

fn ascii_digits<const N: usize>(value: &str) -> Option<[u32; N]> {
    let bytes = value.as_bytes();
    if bytes.len() != N {
        return None;
    }
    let mut digits = [0u32; N];
    for (slot, byte) in digits.iter_mut().zip(bytes) {
        if !byte.is_ascii_digit() {
            return None;
        }
        *slot = u32::from(byte - b'0');
    }
    Some(digits)
}

fn all_same(digits: &[u32]) -> bool {
    digits.windows(2).all(|pair| pair[0] == pair[1])
}

/// Modulo-11 check digit; remainders 0 and 1 map to 0.
fn check_digit(digits: &[u32], weights: &[u32]) -> u32 {
    let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
    match sum % 11 {
        0 | 1 => 0,
        rem => 11 - rem,
    }
}
