/// Widgets and providers shared by the test cases, registered under `demo`.
mod demo_widgets {

	use std::sync::Arc ;
	use std::sync::atomic::{ AtomicI64, Ordering };
	use imery::{
		Args, Backend, CallError, Param, ParamSchema, ParamType,
		Registrar, Registration, RegistrationKey, RegistryError, Widget, WidgetBinding,
	};
	use serde_yaml::Value ;

	/// Shows its `text` parameter, or the bound data when it has none.
	#[derive( Debug )]
	pub struct Label { text: Option<String> }

	impl Widget for Label {
		fn render( &mut self, ui: &mut dyn Backend, data: Option<&mut Value> ) -> Result<(), CallError> {
			let text = match ( &self.text, data ) {
				( Some( text ), _ ) => text.clone(),
				( None, Some( Value::String( value ))) => value.clone(),
				( None, Some( value )) => serde_yaml::to_string( &*value )
					.map_err(| err | CallError::Other( Box::new( err )))?
					.trim_end()
					.to_string(),
				( None, None ) => String::new(),
			};
			ui.text( &text );
			Ok(())
		}
		fn value( &self ) -> Value { self.text.clone().map_or( Value::Null, Value::from )}
	}

	/// A button incrementing its bound integer when clicked.
	#[derive( Debug )]
	pub struct Button { label: String }

	impl Widget for Button {
		fn render( &mut self, ui: &mut dyn Backend, data: Option<&mut Value> ) -> Result<(), CallError> {
			let clicked = ui.button( &self.label );
			if let Some( value ) = data.filter(|_| clicked ) {
				let count = value.as_i64().unwrap_or( 0 );
				*value = Value::from( count + 1 );
			}
			Ok(())
		}
		fn value( &self ) -> Value { Value::from( self.label.as_str() )}
	}

	/// A container wrapping its children in `begin`/`end`.
	#[derive( Debug )]
	pub struct Panel { id: String }

	impl Widget for Panel {
		fn render( &mut self, ui: &mut dyn Backend, _data: Option<&mut Value> ) -> Result<(), CallError> {
			ui.begin( &self.id );
			Ok(())
		}
		fn render_end( &mut self, ui: &mut dyn Backend ) -> Result<(), CallError> {
			ui.end();
			Ok(())
		}
	}

	fn string_param( binding: &WidgetBinding<'_>, name: &str ) -> Option<String> {
		binding.params.get( name ).and_then( Value::as_str ).map( str::to_string )
	}

	/// Registers `demo.widget.{label,button,panel}` and `demo.data.{counter,greeting}`.
	///
	/// `demo.data.counter` returns how many times it was called, starting at 1.
	pub fn register( registrar: &mut Registrar<'_> ) -> Result<(), RegistryError> {

		registrar.widget( "demo", "label", | binding | Ok( Label { text: string_param( &binding, "text" )}))?;

		registrar.register(
			RegistrationKey::widget( "demo", "button" )?,
			Registration::widget(| binding | Ok( Button {
				label: string_param( &binding, "label" ).ok_or_else(|| CallError::MissingArgument( "label".into() ))?,
			}))
			.with_schema( ParamSchema::new([ Param::required( "label", ParamType::String )])),
		)?;

		registrar.register(
			RegistrationKey::widget( "demo", "panel" )?,
			Registration::widget(| binding | Ok( Panel { id: string_param( &binding, "id" ).unwrap_or_default() }))
				.with_schema( ParamSchema::new([ Param::optional( "id", ParamType::String, "panel" )])),
		)?;

		let calls = Arc::new( AtomicI64::new( 0 ));
		registrar.data( "demo", "counter", move | _: &Args | Ok( calls.fetch_add( 1, Ordering::SeqCst ) + 1 ))?;

		registrar.register(
			RegistrationKey::data( "demo", "greeting" )?,
			Registration::data(| args: &Args | Ok( format!( "hello {}", args.require( "name" )?.as_str().unwrap_or_default() )))
				.with_schema( ParamSchema::new([ Param::optional( "name", ParamType::String, "world" )])),
		)?;

		Ok(())

	}

	/// A context with the demo registrations already applied.
	pub fn app() -> imery::Imery {
		let mut app = imery::Imery::new();
		register( &mut app.registrar() ).expect( "demo widgets failed to register" );
		app
	}

	/// A demo context holding the in-memory `modules`, with `entry` loaded.
	pub fn load( modules: &[( &str, &str )], entry: &str ) -> ( imery::Imery, Result<Vec<imery::Warning>, imery::ResolveErrors> ) {
		let mut app = app();
		modules.iter().for_each(|( id, text )| app.add_module( *id, *text ));
		let loaded = app.load( &imery::DocumentId::module( entry ));
		( app, loaded )
	}
}
