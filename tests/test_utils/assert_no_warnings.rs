#[macro_export]
macro_rules! assert_no_warnings {
	( $warnings:expr ) => {{
		let warnings = $warnings ;
		if !warnings.is_empty() { panic!( "Produced warnings: {:?}", warnings ) }
	}};
}
