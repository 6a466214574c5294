//! Parameter schemas.
//!
//! A registration may declare the parameters it accepts. The resolver applies
//! the schema to every document node bound to that registration: absent
//! parameters take their declared default, absent parameters without a default
//! are reported, and present parameters are checked against the declared type.

use serde_yaml::{ Mapping, Value };
use thiserror::Error ;



/// The type a parameter value must have.
#[derive( Copy, Clone, Debug, PartialEq, Eq, Default )]
pub enum ParamType {
	#[default] Any,
	String,
	Bool,
	Integer,
	/// Any number; integers are accepted.
	Float,
	List,
	Map,
}

impl ParamType {
	/// Returns true if `value` is acceptable for this type. `null` is only
	/// accepted by [`ParamType::Any`].
	pub fn accepts( self, value: &Value ) -> bool {
		match ( self, value ) {
			( Self::Any, _ ) => true,
			( Self::String, Value::String( _ ))
			| ( Self::Bool, Value::Bool( _ ))
			| ( Self::List, Value::Sequence( _ ))
			| ( Self::Map, Value::Mapping( _ )) => true,
			( Self::Integer, Value::Number( number )) => number.is_i64() || number.is_u64(),
			( Self::Float, Value::Number( _ )) => true,
			_ => false,
		}
	}
}

impl std::fmt::Display for ParamType {
	fn fmt( &self, f: &mut std::fmt::Formatter ) -> std::fmt::Result { write!( f, "{:?}", self )}
}

/// A single declared parameter.
#[derive( Clone, Debug, PartialEq )]
pub struct Param {
	name: String,
	ty: ParamType,
	default: Option<Value>,
}

impl Param {

	/// A parameter that must be provided by the document.
	pub fn required( name: impl Into<String>, ty: ParamType ) -> Self {
		Self { name: name.into(), ty, default: None }
	}

	/// A parameter that falls back to `default` when absent.
	pub fn optional( name: impl Into<String>, ty: ParamType, default: impl Into<Value> ) -> Self {
		Self { name: name.into(), ty, default: Some( default.into() )}
	}

	#[inline] pub fn name( &self ) -> &str { &self.name }
	#[inline] pub fn ty( &self ) -> ParamType { self.ty }
	#[inline] pub fn default_value( &self ) -> Option<&Value> { self.default.as_ref() }
}

/// A schema violation found while applying a [`ParamSchema`].
#[derive( Clone, Debug, PartialEq, Error )]
pub enum SchemaViolation {
	/// A parameter without a default was not provided.
	#[error( "Missing required field '{field}' at '{path}'" )]
	MissingRequiredField { path: String, field: String },
	/// A provided parameter has the wrong type.
	#[error( "Field '{field}' at '{path}' expects {expected}" )]
	InvalidFieldType { path: String, field: String, expected: ParamType },
}

/// Ordered list of declared parameters.
#[derive( Clone, Debug, Default, PartialEq )]
pub struct ParamSchema {
	params: Vec<Param>,
}

impl ParamSchema {

	pub fn new( params: impl IntoIterator<Item = Param> ) -> Self {
		Self { params: params.into_iter().collect() }
	}

	#[inline] pub fn params( &self ) -> &[Param] { &self.params }

	/// Fills defaults into `values` and validates the result.
	///
	/// Parameters not declared by the schema are left untouched. All violations
	/// are reported, not just the first.
	///
	/// # Errors
	/// Returns every [`SchemaViolation`] found; `values` still holds every default
	/// that could be applied.
	pub fn apply( &self, values: &mut Mapping, path: &str ) -> Result<(), Vec<SchemaViolation>> {
		let violations = self.params.iter()
			.filter_map(| param | {
				let key = Value::String( param.name.clone() );
				let accepted = values.get( &key ).map(| value | param.ty.accepts( value ));
				match ( accepted, &param.default ) {
					( Some( true ), _ ) => None,
					( Some( false ), _ ) => Some( SchemaViolation::InvalidFieldType {
						path: path.to_string(),
						field: param.name.clone(),
						expected: param.ty,
					}),
					( None, Some( default )) => {
						values.insert( key, default.clone() );
						None
					},
					( None, None ) => Some( SchemaViolation::MissingRequiredField {
						path: path.to_string(),
						field: param.name.clone(),
					}),
				}
			})
			.collect::<Vec<_>>();
		match violations.is_empty() {
			true => Ok(()),
			false => Err( violations ),
		}
	}
}

impl FromIterator<Param> for ParamSchema {
	fn from_iter<T: IntoIterator<Item = Param>>( iter: T ) -> Self { Self::new( iter )}
}

#[cfg( test )]
mod tests {
	use super::* ;

	fn mapping( yaml: &str ) -> Mapping {
		serde_yaml::from_str( yaml ).unwrap()
	}

	#[test]
	fn fills_defaults_and_keeps_provided_values() {
		let schema = ParamSchema::new([
			Param::optional( "height", ParamType::Integer, 4 ),
			Param::required( "label", ParamType::String ),
		]);
		let mut values = mapping( "label: Name" );
		schema.apply( &mut values, "widgets.list" ).unwrap();
		assert_eq!( values.get( "height" ), Some( &Value::from( 4 )));
		assert_eq!( values.get( "label" ), Some( &Value::from( "Name" )));
	}

	#[test]
	fn reports_every_violation() {
		let schema = ParamSchema::new([
			Param::required( "label", ParamType::String ),
			Param::required( "items", ParamType::List ),
			Param::optional( "height", ParamType::Integer, 4 ),
		]);
		let mut values = mapping( "height: tall" );
		let violations = schema.apply( &mut values, "app" ).unwrap_err();
		assert_eq!( violations, vec![
			SchemaViolation::MissingRequiredField { path: "app".into(), field: "label".into() },
			SchemaViolation::MissingRequiredField { path: "app".into(), field: "items".into() },
			SchemaViolation::InvalidFieldType { path: "app".into(), field: "height".into(), expected: ParamType::Integer },
		]);
	}

	#[test]
	fn float_accepts_integers() {
		assert!( ParamType::Float.accepts( &Value::from( 3 )));
		assert!( !ParamType::Integer.accepts( &Value::from( 3.5 )));
		assert!( !ParamType::String.accepts( &Value::Null ));
	}
}
